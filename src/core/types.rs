// 実行に関連するデータ型定義

use super::error::PipelineError;

/// 1回の実行のライフサイクル状態
///
/// Drainingは最後のproducerが完了を報告したときに一度だけ入る。
/// 終端状態はCompletedとFailedのみ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RunState {
    Idle,
    Starting,
    Running,
    Draining,
    Joined,
    Completed,
    Failed,
}

impl RunState {
    /// 終端状態かどうか
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// 実行全体のサマリー
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RunSummary {
    pub producer_count: usize,
    pub consumer_count: usize,
    pub capacity: usize,
    pub items_produced: usize,
    pub items_processed: usize,
    pub error_count: usize,
    pub total_time_ms: u64,
}

/// producerユニットの完了報告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerReport {
    pub unit_id: usize,
    pub items_produced: usize,
    /// バッファのクローズまたはキャンセルで停止した場合true
    /// （供給源が尽きて停止した場合はfalse）
    pub stopped_early: bool,
}

/// consumerユニットの完了報告
///
/// sinkの所有権はユニット実行中はタスク側にあり、完了時にここで
/// 呼び出し元へ返却される。
#[derive(Debug)]
pub struct ConsumerReport<K> {
    pub unit_id: usize,
    pub items_consumed: usize,
    pub cancelled: bool,
    pub sink: K,
}

/// 1回の実行の最終結果
///
/// 完走時はerrorsが空。失敗時も可能な範囲で集計とsinkの回収は行われ、
/// 発生順のエラー一覧とともに返される。
#[derive(Debug)]
pub struct RunOutcome<K> {
    pub summary: RunSummary,
    pub final_state: RunState,
    /// 遭遇したエラーの一覧（ユニット順に記録）
    pub errors: Vec<PipelineError>,
    /// 生き残ったconsumerのsink（ユニットID昇順）
    pub sinks: Vec<K>,
}

impl<K> RunOutcome<K> {
    /// エラーなしで完走したかどうか
    pub fn is_completed(&self) -> bool {
        self.errors.is_empty()
    }

    /// 最初に記録されたエラー
    pub fn first_error(&self) -> Option<&PipelineError> {
        self.errors.first()
    }
}
