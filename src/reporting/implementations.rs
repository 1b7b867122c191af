// 進捗報告の具象実装

use async_trait::async_trait;

use super::traits::ProgressReporter;
use crate::core::types::RunState;

/// コンソール出力による進捗報告実装
#[derive(Debug, Default, Clone)]
pub struct ConsoleProgressReporter {
    quiet: bool,
}

impl ConsoleProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleProgressReporter {
    async fn report_started(&self, producer_count: usize, consumer_count: usize) {
        if !self.quiet {
            println!("🚀 Starting {producer_count} producer(s) / {consumer_count} consumer(s)...");
        }
    }

    async fn report_state(&self, state: RunState) {
        if !self.quiet {
            println!("📊 State: {state:?}");
        }
    }

    async fn report_unit_error(&self, unit: &str, unit_id: usize, error: &str) {
        if !self.quiet {
            eprintln!("❌ Error in {unit} {unit_id}: {error}");
        }
    }

    async fn report_completed(&self, items_processed: usize, error_count: usize) {
        if !self.quiet {
            println!("✅ Completed! Processed: {items_processed}, Errors: {error_count}");
        }
    }
}

/// 何もしない進捗報告実装（テスト・ベンチマーク用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _producer_count: usize, _consumer_count: usize) {}

    async fn report_state(&self, _state: RunState) {}

    async fn report_unit_error(&self, _unit: &str, _unit_id: usize, _error: &str) {}

    async fn report_completed(&self, _items_processed: usize, _error_count: usize) {}
}
