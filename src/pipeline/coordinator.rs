// Coordinator - 実行ライフサイクルの統括
// バッファ構築、ユニット起動、クローズ契機の一元管理、join順序の制御

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::consumer::spawn_consumers;
use super::producer::spawn_producer;
use crate::buffer::BoundedBuffer;
use crate::config::PipelineConfig;
use crate::core::error::{PipelineError, PipelineResult};
use crate::core::types::{RunOutcome, RunState, RunSummary};
use crate::io::{ItemSink, ItemSource};
use crate::reporting::ProgressReporter;

/// パイプライン実行の統括役
///
/// 共有バッファとproducer/consumerユニット群を所有し、起動・クローズ・
/// joinの順序を一手に引き受ける。バッファのクローズ契機はここだけ：
/// 最後のproducerのjoin完了後に一度だけ呼ぶ。producer個別のクローズを
/// 許すと、遅いproducerのアイテムが取りこぼされる。
///
/// 1インスタンスにつき1回の実行を想定する。
///
/// 状態遷移: `Idle → Starting → Running → Draining → Joined →
/// {Completed | Failed}`。watchチャンネルで外部から観測できる。
pub struct Coordinator<C, R> {
    config: C,
    reporter: R,
    cancel: CancellationToken,
    state_tx: watch::Sender<RunState>,
}

impl<C, R> Coordinator<C, R>
where
    C: PipelineConfig,
    R: ProgressReporter,
{
    /// 新しいCoordinatorを作成
    ///
    /// 設定とレポーターをコンストラクタで注入する（Constructor Injection）
    pub fn new(config: C, reporter: R) -> Self {
        let (state_tx, _) = watch::channel(RunState::Idle);
        Self {
            config,
            reporter,
            cancel: CancellationToken::new(),
            state_tx,
        }
    }

    /// 設定への参照を取得（読み取り専用アクセス）
    pub fn config(&self) -> &C {
        &self.config
    }

    /// 現在の実行状態を取得
    pub fn state(&self) -> RunState {
        *self.state_tx.borrow()
    }

    /// 状態遷移の購読チャンネルを取得
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.state_tx.subscribe()
    }

    /// 実行を外部からキャンセルする
    ///
    /// 待機中のユニットは速やかに停止し、close-and-joinの手順は
    /// それでも実施される（ブロックされたタスクを残さない）。
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// 外部キャンセル用のトークンを取得
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// パイプラインを実行する
    ///
    /// 供給源・出力先はユニットごとに1つずつ渡す（ユニット私有であり、
    /// ユニット間で共有されない）。手順:
    /// 1. 設定検証（失敗時は`ConfigurationError`で即座に返る）
    /// 2. 共有バッファ構築、全ユニットを子トークン上で起動
    /// 3. 全producerをjoin → バッファをクローズ（唯一のクローズ契機）
    /// 4. 全consumerをjoin、sinkを回収
    /// 5. 集計結果とエラー一覧を`RunOutcome`として返す
    pub async fn run<T, S, K>(&self, sources: Vec<S>, sinks: Vec<K>) -> PipelineResult<RunOutcome<K>>
    where
        T: Send + 'static,
        S: ItemSource<T> + 'static,
        K: ItemSink<T> + 'static,
    {
        self.validate(sources.len(), sinks.len())?;

        let start_time = Instant::now();
        let producer_count = sources.len();
        let consumer_count = sinks.len();

        self.transition(RunState::Starting).await;

        let buffer = Arc::new(BoundedBuffer::new(self.config.capacity()));
        // ユニット障害時は子トークンだけをキャンセルする。親トークンは
        // 外部キャンセル専用に残し、後段で両者を区別できるようにする
        let unit_cancel = self.cancel.child_token();

        if self.config.enable_progress_reporting() {
            self.reporter
                .report_started(producer_count, consumer_count)
                .await;
        }

        let producer_handles: Vec<_> = sources
            .into_iter()
            .enumerate()
            .map(|(unit_id, source)| {
                spawn_producer(unit_id, source, buffer.clone(), unit_cancel.clone())
            })
            .collect();
        let consumer_handles = spawn_consumers(sinks, &buffer, &unit_cancel);

        self.transition(RunState::Running).await;

        let mut errors = Vec::new();
        let mut items_produced = 0;

        for (unit_id, handle) in producer_handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(report)) => items_produced += report.items_produced,
                Ok(Err(error)) => {
                    self.record_unit_error(&mut errors, "producer", unit_id, error)
                        .await;
                    unit_cancel.cancel();
                }
                Err(join_error) => {
                    self.record_unit_error(
                        &mut errors,
                        "producer",
                        unit_id,
                        PipelineError::task(join_error),
                    )
                    .await;
                    unit_cancel.cancel();
                }
            }
        }

        // 全producerのjoin完了後にのみクローズする
        self.transition(RunState::Draining).await;
        buffer.close();

        let mut items_processed = 0;
        let mut collected_sinks = Vec::new();

        for (unit_id, handle) in consumer_handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(report)) => {
                    items_processed += report.items_consumed;
                    collected_sinks.push(report.sink);
                }
                Ok(Err(error)) => {
                    self.record_unit_error(&mut errors, "consumer", unit_id, error)
                        .await;
                    unit_cancel.cancel();
                }
                Err(join_error) => {
                    self.record_unit_error(
                        &mut errors,
                        "consumer",
                        unit_id,
                        PipelineError::task(join_error),
                    )
                    .await;
                    unit_cancel.cancel();
                }
            }
        }

        self.transition(RunState::Joined).await;

        // ユニット障害由来ではない外部キャンセルをエラーとして分類する
        if self.cancel.is_cancelled() && errors.is_empty() {
            errors.push(PipelineError::cancelled(
                "実行が外部からキャンセルされました",
            ));
        }

        let final_state = if errors.is_empty() {
            RunState::Completed
        } else {
            RunState::Failed
        };
        self.transition(final_state).await;

        if self.config.enable_progress_reporting() {
            self.reporter
                .report_completed(items_processed, errors.len())
                .await;
        }

        let summary = RunSummary {
            producer_count,
            consumer_count,
            capacity: self.config.capacity(),
            items_produced,
            items_processed,
            error_count: errors.len(),
            total_time_ms: start_time.elapsed().as_millis() as u64,
        };

        Ok(RunOutcome {
            summary,
            final_state,
            errors,
            sinks: collected_sinks,
        })
    }

    /// 実行前の設定検証
    fn validate(&self, source_count: usize, sink_count: usize) -> PipelineResult<()> {
        if self.config.capacity() == 0 {
            return Err(PipelineError::configuration(
                "バッファ容量は1以上である必要があります",
            ));
        }
        if self.config.producer_count() == 0 {
            return Err(PipelineError::configuration(
                "producer数は1以上である必要があります",
            ));
        }
        if self.config.consumer_count() == 0 {
            return Err(PipelineError::configuration(
                "consumer数は1以上である必要があります",
            ));
        }
        if source_count != self.config.producer_count() {
            return Err(PipelineError::configuration(format!(
                "供給源の数({source_count})がproducer数({})と一致しません",
                self.config.producer_count()
            )));
        }
        if sink_count != self.config.consumer_count() {
            return Err(PipelineError::configuration(format!(
                "出力先の数({sink_count})がconsumer数({})と一致しません",
                self.config.consumer_count()
            )));
        }
        Ok(())
    }

    async fn transition(&self, state: RunState) {
        // 購読者の有無に関わらず状態を更新する
        self.state_tx.send_replace(state);
        if self.config.enable_progress_reporting() {
            self.reporter.report_state(state).await;
        }
    }

    async fn record_unit_error(
        &self,
        errors: &mut Vec<PipelineError>,
        unit: &str,
        unit_id: usize,
        error: PipelineError,
    ) {
        if self.config.enable_progress_reporting() {
            self.reporter
                .report_unit_error(unit, unit_id, &error.to_string())
                .await;
        }
        errors.push(error);
    }
}
