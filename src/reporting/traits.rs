// 進捗報告のトレイト定義

use async_trait::async_trait;
use mockall::automock;

use crate::core::types::RunState;

/// 実行の進捗報告を抽象化するトレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 実行開始時の報告
    async fn report_started(&self, producer_count: usize, consumer_count: usize);

    /// 実行状態遷移の報告
    async fn report_state(&self, state: RunState);

    /// ユニットのエラー発生時の報告
    async fn report_unit_error(&self, unit: &str, unit_id: usize, error: &str);

    /// 実行完了時の報告
    async fn report_completed(&self, items_processed: usize, error_count: usize);
}
