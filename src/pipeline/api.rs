// 高レベル公開API
// Coordinatorを簡単に使用できるようにするための便利な関数

use super::coordinator::Coordinator;
use crate::config::DefaultPipelineConfig;
use crate::core::error::PipelineResult;
use crate::core::types::RunOutcome;
use crate::io::{ItemSink, ItemSource};
use crate::reporting::{ConsoleProgressReporter, NoOpProgressReporter};

/// デフォルト設定でパイプラインを実行する
///
/// ユニット数は渡した供給源・出力先の数から決まる。進捗は
/// コンソールに報告される。
pub async fn run_pipeline<T, S, K>(
    capacity: usize,
    sources: Vec<S>,
    sinks: Vec<K>,
) -> PipelineResult<RunOutcome<K>>
where
    T: Send + 'static,
    S: ItemSource<T> + 'static,
    K: ItemSink<T> + 'static,
{
    let config = DefaultPipelineConfig::default()
        .with_capacity(capacity)
        .with_producer_count(sources.len())
        .with_consumer_count(sinks.len());
    Coordinator::new(config, ConsoleProgressReporter::new())
        .run(sources, sinks)
        .await
}

/// 静音版のパイプライン実行（テスト・バックグラウンド処理用）
pub async fn run_pipeline_quiet<T, S, K>(
    capacity: usize,
    sources: Vec<S>,
    sinks: Vec<K>,
) -> PipelineResult<RunOutcome<K>>
where
    T: Send + 'static,
    S: ItemSource<T> + 'static,
    K: ItemSink<T> + 'static,
{
    let config = DefaultPipelineConfig::default()
        .with_capacity(capacity)
        .with_producer_count(sources.len())
        .with_consumer_count(sinks.len())
        .with_progress_reporting(false);
    Coordinator::new(config, NoOpProgressReporter::new())
        .run(sources, sinks)
        .await
}
