// テスト用の設定モック実装

use super::traits::PipelineConfig;

pub struct MockPipelineConfig {
    pub capacity: usize,
    pub producer_count: usize,
    pub consumer_count: usize,
    pub enable_progress: bool,
}

impl PipelineConfig for MockPipelineConfig {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn producer_count(&self) -> usize {
        self.producer_count
    }

    fn consumer_count(&self) -> usize {
        self.consumer_count
    }

    fn enable_progress_reporting(&self) -> bool {
        self.enable_progress
    }
}
