use anyhow::Result;
use clap::Parser;

use item_pipeline::io::{CollectingSink, RangeSource};
use item_pipeline::{
    ConsoleProgressReporter, Coordinator, DefaultPipelineConfig, NoOpProgressReporter,
};

#[derive(Parser)]
#[command(name = "item_pipeline")]
#[command(about = "A bounded producer-consumer pipeline demo")]
#[command(version)]
struct Args {
    /// Shared buffer capacity
    #[arg(short = 'b', long, default_value = "4")]
    capacity: usize,

    /// Number of producer units
    #[arg(short, long, default_value = "1")]
    producers: usize,

    /// Number of consumer units
    #[arg(short, long, default_value = "1")]
    consumers: usize,

    /// Items emitted per producer
    #[arg(short = 'n', long, default_value = "10")]
    items: i64,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if !args.quiet {
        println!("🚀 Producer-Consumerパイプライン デモ");
        println!("⚙️  設定:");
        println!("   - バッファ容量: {}", args.capacity);
        println!("   - producer数: {}", args.producers);
        println!("   - consumer数: {}", args.consumers);
        println!("   - producerあたりのアイテム数: {}", args.items);
    }

    // producerごとに重複しない整数範囲を割り当てる
    let sources: Vec<RangeSource> = (0..args.producers as i64)
        .map(|i| RangeSource::new(i * args.items + 1, (i + 1) * args.items))
        .collect();
    let sinks: Vec<CollectingSink<i64>> = (0..args.consumers)
        .map(|_| CollectingSink::new())
        .collect();

    let config = DefaultPipelineConfig::default()
        .with_capacity(args.capacity)
        .with_producer_count(args.producers)
        .with_consumer_count(args.consumers)
        .with_progress_reporting(!args.quiet);

    let outcome = if args.quiet {
        Coordinator::new(config, NoOpProgressReporter::new())
            .run(sources, sinks)
            .await?
    } else {
        Coordinator::new(config, ConsoleProgressReporter::new())
            .run(sources, sinks)
            .await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    } else {
        println!("\n📊 実行結果:");
        println!("   - 生成アイテム数: {}", outcome.summary.items_produced);
        println!("   - 処理アイテム数: {}", outcome.summary.items_processed);
        println!("   - エラー数: {}", outcome.summary.error_count);
        println!("   - 総処理時間: {}ms", outcome.summary.total_time_ms);
        for (i, sink) in outcome.sinks.iter().enumerate() {
            println!("   - consumer {i}: {}件", sink.len());
        }
    }

    if let Some(error) = outcome.first_error() {
        eprintln!("❌ エラー: {error}");
        std::process::exit(1);
    }

    Ok(())
}
