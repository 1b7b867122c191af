// Consumer - バッファから出力先へのアイテム転送ユニット

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::buffer::{BoundedBuffer, TakeError};
use crate::core::error::{PipelineError, PipelineResult};
use crate::core::types::ConsumerReport;
use crate::io::ItemSink;

/// 単一Consumerユニットを起動する
///
/// 終端シグナル（クローズ済みかつ排出完了）かキャンセルまで
/// `take` → `accept` を繰り返す。クローズ後も残アイテムは破棄せず
/// 排出し切る。出力先のエラー時は共有トークンをキャンセルして
/// 兄弟ユニットを停止させてから、エラーを報告する。
/// sinkの所有権は完了報告で呼び出し元へ返却される。
pub fn spawn_consumer<T, K>(
    unit_id: usize,
    mut sink: K,
    buffer: Arc<BoundedBuffer<T>>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<PipelineResult<ConsumerReport<K>>>
where
    T: Send + 'static,
    K: ItemSink<T> + 'static,
{
    tokio::spawn(async move {
        let mut items_consumed = 0;
        let mut cancelled = false;

        loop {
            // 残アイテムが絶えない場合でもキャンセルを速やかに観測する
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            match buffer.take(&cancel).await {
                Ok(Some(item)) => {
                    if let Err(error) = sink.accept(item).await {
                        cancel.cancel();
                        return Err(PipelineError::sink(unit_id, error));
                    }
                    items_consumed += 1;
                }
                Ok(None) => break, // 終端シグナル
                Err(TakeError::Cancelled) => {
                    cancelled = true;
                    break;
                }
            }
        }

        Ok(ConsumerReport {
            unit_id,
            items_consumed,
            cancelled,
            sink,
        })
    })
}

/// Consumerプールを起動する。sink1つにつき1ユニット
pub fn spawn_consumers<T, K>(
    sinks: Vec<K>,
    buffer: &Arc<BoundedBuffer<T>>,
    cancel: &CancellationToken,
) -> Vec<tokio::task::JoinHandle<PipelineResult<ConsumerReport<K>>>>
where
    T: Send + 'static,
    K: ItemSink<T> + 'static,
{
    sinks
        .into_iter()
        .enumerate()
        .map(|(unit_id, sink)| spawn_consumer(unit_id, sink, buffer.clone(), cancel.clone()))
        .collect()
}
