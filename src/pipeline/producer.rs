// Producer - 供給源からバッファへのアイテム投入ユニット

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::buffer::{BoundedBuffer, PutError};
use crate::core::error::{PipelineError, PipelineResult};
use crate::core::types::ProducerReport;
use crate::io::ItemSource;

/// Producerユニットを起動する
///
/// 供給源が尽きるか、バッファがクローズされるか、キャンセルされるまで
/// `next_item` → `put` を繰り返す。クローズは停止シグナルとして扱い、
/// 自らバッファをクローズすることはない（クローズ契機はCoordinatorが
/// 一元管理する）。供給源のエラー時は共有トークンをキャンセルして
/// 兄弟ユニットを停止させてから、エラーを報告する。
pub fn spawn_producer<T, S>(
    unit_id: usize,
    mut source: S,
    buffer: Arc<BoundedBuffer<T>>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<PipelineResult<ProducerReport>>
where
    T: Send + 'static,
    S: ItemSource<T> + 'static,
{
    tokio::spawn(async move {
        let mut items_produced = 0;
        let mut stopped_early = false;

        loop {
            // 待機に入らない経路でもキャンセルを速やかに観測する
            if cancel.is_cancelled() {
                stopped_early = true;
                break;
            }

            let next = match source.next_item().await {
                Ok(next) => next,
                Err(error) => {
                    cancel.cancel();
                    return Err(PipelineError::source(unit_id, error));
                }
            };

            let Some(item) = next else {
                // 供給源の尽き。正常停止
                break;
            };

            match buffer.put(item, &cancel).await {
                Ok(()) => items_produced += 1,
                Err(PutError::Closed(_)) | Err(PutError::Cancelled(_)) => {
                    stopped_early = true;
                    break;
                }
            }
        }

        Ok(ProducerReport {
            unit_id,
            items_produced,
            stopped_early,
        })
    })
}
