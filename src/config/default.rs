// デフォルト設定実装

use super::traits::PipelineConfig;

/// デフォルト設定実装
#[derive(Debug, Clone)]
pub struct DefaultPipelineConfig {
    capacity: usize,
    producer_count: usize,
    consumer_count: usize,
    enable_progress: bool,
}

impl DefaultPipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_producer_count(mut self, producer_count: usize) -> Self {
        self.producer_count = producer_count;
        self
    }

    pub fn with_consumer_count(mut self, consumer_count: usize) -> Self {
        self.consumer_count = consumer_count;
        self
    }

    pub fn with_progress_reporting(mut self, enable: bool) -> Self {
        self.enable_progress = enable;
        self
    }
}

impl Default for DefaultPipelineConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            producer_count: 1,
            consumer_count: num_cpus::get().max(1),
            enable_progress: true,
        }
    }
}

impl PipelineConfig for DefaultPipelineConfig {
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
