// BoundedBuffer - 容量制限付きブロッキングFIFOバッファ
// ロック + 2つの待機条件（not full / not empty）によるモニター方式

use std::collections::VecDeque;
use std::sync::Mutex;

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use super::error::{PutError, TakeError};

/// 容量制限付きのブロッキングFIFOバッファ
///
/// 複数のproducer/consumerタスクから`Arc`経由で共有される。満杯時の
/// `put`と空時の`take`は呼び出しタスクを待機させる（破棄も拡張もしない）。
/// 内部ロックは待機中には保持されない。
///
/// 順序保証は厳密なFIFO。複数producer間の割り込み順はロック獲得順に
/// 依存して非決定的だが、一度格納された後の順序は保たれる。待機者の
/// 起床順も非決定的（`Notify::notify_one`に委ねる）で、公平性は
/// 有限競合下で飢餓が起きないことのみを保証する。
pub struct BoundedBuffer<T> {
    capacity: usize,
    state: Mutex<BufferState<T>>,
    not_full: Notify,
    not_empty: Notify,
}

struct BufferState<T> {
    queue: VecDeque<T>,
    closed: bool,
}

impl<T> BoundedBuffer<T> {
    /// 指定容量のバッファを作成
    ///
    /// 容量の妥当性検証（`ConfigurationError`への変換）は呼び出し側の
    /// 責務。ここでは0容量のバッファは構築不能とする。
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "バッファ容量は1以上である必要があります");
        Self {
            capacity,
            state: Mutex::new(BufferState {
                queue: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            not_full: Notify::new(),
            not_empty: Notify::new(),
        }
    }

    /// アイテムを末尾に追加する。満杯かつオープンの間は待機する
    ///
    /// クローズ済み（または待機中にクローズされた）場合は
    /// `PutError::Closed`でアイテムを返却し、エンキューはされない。
    /// キャンセル時は`PutError::Cancelled`でアイテムを返却し、
    /// バッファ状態は変更されない。
    pub async fn put(&self, item: T, cancel: &CancellationToken) -> Result<(), PutError<T>> {
        let mut item = Some(item);
        loop {
            let notified = {
                let mut state = self.state.lock().unwrap();
                if state.closed {
                    return Err(PutError::Closed(item.take().unwrap()));
                }
                if state.queue.len() < self.capacity {
                    state.queue.push_back(item.take().unwrap());
                    // 待機中のconsumerを1つ起こす
                    self.not_empty.notify_one();
                    return Ok(());
                }
                // ロック保持中に待機futureを作成する。こうすることで
                // close()のnotify_waiters（作成済みの待機者のみを起こす）
                // を取りこぼさない
                self.not_full.notified()
            };

            tokio::select! {
                _ = notified => {}
                _ = cancel.cancelled() => {
                    // 消費した起床許可を別の待機producerへ引き継ぐ
                    self.not_full.notify_one();
                    return Err(PutError::Cancelled(item.take().unwrap()));
                }
            }
        }
    }

    /// 先頭のアイテムを取り出す。空かつオープンの間は待機する
    ///
    /// クローズ済みでも残アイテムは排出され、空になってから
    /// `Ok(None)`（終端シグナル）を返す。キャンセル時は
    /// `TakeError::Cancelled`を返し、バッファ状態は変更されない。
    pub async fn take(&self, cancel: &CancellationToken) -> Result<Option<T>, TakeError> {
        loop {
            let notified = {
                let mut state = self.state.lock().unwrap();
                if let Some(item) = state.queue.pop_front() {
                    // 待機中のproducerを1つ起こす
                    self.not_full.notify_one();
                    return Ok(Some(item));
                }
                if state.closed {
                    return Ok(None);
                }
                self.not_empty.notified()
            };

            tokio::select! {
                _ = notified => {}
                _ = cancel.cancelled() => {
                    // 消費した起床許可を別の待機consumerへ引き継ぐ
                    self.not_empty.notify_one();
                    return Err(TakeError::Cancelled);
                }
            }
        }
    }

    /// バッファをクローズし、全待機者を起こす。冪等
    ///
    /// クローズは「これ以上追加されない」ことを意味し、残アイテムの
    /// 排出は妨げない。
    pub fn close(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return;
            }
            state.closed = true;
        }
        self.not_full.notify_waiters();
        self.not_empty.notify_waiters();
    }

    /// 現在の格納数（スナップショット、診断用）
    ///
    /// 返却値は読み取り時点の値であり、正しさの判定に使ってはならない。
    /// 実際のガードはput/take内部でロック下に行われる。
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }

    /// 空かどうか（スナップショット、診断用）
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 満杯かどうか（スナップショット、診断用）
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// クローズ済みかどうか（スナップショット）
    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    /// 最大容量
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::{timeout, Duration};

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn test_basic_put_take_fifo_order() {
        let buffer = BoundedBuffer::new(3);
        let cancel = token();

        buffer.put(1, &cancel).await.unwrap();
        buffer.put(2, &cancel).await.unwrap();

        assert_eq!(buffer.take(&cancel).await.unwrap(), Some(1));
        assert_eq!(buffer.take(&cancel).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_len_snapshots() {
        let buffer = BoundedBuffer::new(2);
        let cancel = token();

        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
        assert_eq!(buffer.capacity(), 2);

        buffer.put("a", &cancel).await.unwrap();
        assert_eq!(buffer.len(), 1);

        buffer.put("b", &cancel).await.unwrap();
        assert!(buffer.is_full());
        assert_eq!(buffer.len(), 2);
    }

    #[tokio::test]
    async fn test_put_after_close_fails_with_item() {
        let buffer = BoundedBuffer::new(2);
        let cancel = token();

        buffer.put(1, &cancel).await.unwrap();
        buffer.close();

        match buffer.put(2, &cancel).await {
            Err(PutError::Closed(item)) => assert_eq!(item, 2),
            other => panic!("Closedが返るべき: {other:?}"),
        }
        // クローズ時点の内容は変わらない
        assert_eq!(buffer.len(), 1);
    }

    #[tokio::test]
    async fn test_take_drains_after_close_then_end_of_stream() {
        let buffer = BoundedBuffer::new(3);
        let cancel = token();

        buffer.put(1, &cancel).await.unwrap();
        buffer.put(2, &cancel).await.unwrap();
        buffer.close();

        // クローズは「破棄」ではない。残アイテムは排出される
        assert_eq!(buffer.take(&cancel).await.unwrap(), Some(1));
        assert_eq!(buffer.take(&cancel).await.unwrap(), Some(2));
        assert_eq!(buffer.take(&cancel).await.unwrap(), None);
        // 終端シグナルは繰り返し観測できる
        assert_eq!(buffer.take(&cancel).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let buffer = BoundedBuffer::<i32>::new(1);
        let cancel = token();

        buffer.close();
        buffer.close();

        assert!(buffer.is_closed());
        assert_eq!(buffer.take(&cancel).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blocked_put_unblocks_on_take() {
        let buffer = Arc::new(BoundedBuffer::new(1));
        let cancel = token();
        buffer.put(1, &cancel).await.unwrap();

        let buffer_clone = buffer.clone();
        let cancel_clone = cancel.clone();
        let put_handle =
            tokio::spawn(async move { buffer_clone.put(2, &cancel_clone).await });

        // putが待機状態に入るまで少し待つ
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!put_handle.is_finished(), "満杯バッファへのputは待機すべき");

        assert_eq!(buffer.take(&cancel).await.unwrap(), Some(1));

        timeout(Duration::from_secs(1), put_handle)
            .await
            .expect("takeの後、putは時間内に解除されるべき")
            .unwrap()
            .unwrap();
        assert_eq!(buffer.take(&cancel).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_blocked_take_unblocks_on_put() {
        let buffer = Arc::new(BoundedBuffer::new(1));
        let cancel = token();

        let buffer_clone = buffer.clone();
        let cancel_clone = cancel.clone();
        let take_handle =
            tokio::spawn(async move { buffer_clone.take(&cancel_clone).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!take_handle.is_finished(), "空バッファのtakeは待機すべき");

        buffer.put(7, &cancel).await.unwrap();

        let taken = timeout(Duration::from_secs(1), take_handle)
            .await
            .expect("putの後、takeは時間内に解除されるべき")
            .unwrap()
            .unwrap();
        assert_eq!(taken, Some(7));
    }

    #[tokio::test]
    async fn test_blocked_put_unblocks_on_close() {
        let buffer = Arc::new(BoundedBuffer::new(1));
        let cancel = token();
        buffer.put(1, &cancel).await.unwrap();

        let buffer_clone = buffer.clone();
        let cancel_clone = cancel.clone();
        let put_handle =
            tokio::spawn(async move { buffer_clone.put(2, &cancel_clone).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        buffer.close();

        let result = timeout(Duration::from_secs(1), put_handle)
            .await
            .expect("closeの後、putは時間内に解除されるべき")
            .unwrap();
        match result {
            Err(PutError::Closed(item)) => assert_eq!(item, 2),
            other => panic!("待機中のputはClosedで失敗すべき: {other:?}"),
        }
        // 待機中だったアイテムはエンキューされていない
        assert_eq!(buffer.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_take_leaves_buffer_untouched() {
        let buffer = Arc::new(BoundedBuffer::<i32>::new(2));
        let cancel = token();

        let buffer_clone = buffer.clone();
        let cancel_clone = cancel.clone();
        let take_handle =
            tokio::spawn(async move { buffer_clone.take(&cancel_clone).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let result = timeout(Duration::from_secs(1), take_handle)
            .await
            .expect("キャンセル後、takeは時間内に戻るべき")
            .unwrap();
        assert_eq!(result, Err(TakeError::Cancelled));
        assert_eq!(buffer.len(), 0);
        assert!(!buffer.is_closed());
    }

    #[tokio::test]
    async fn test_cancelled_put_returns_item() {
        let buffer = Arc::new(BoundedBuffer::new(1));
        let cancel = token();
        buffer.put(1, &cancel).await.unwrap();

        let buffer_clone = buffer.clone();
        let child = cancel.child_token();
        let put_handle = tokio::spawn(async move { buffer_clone.put(2, &child).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let result = timeout(Duration::from_secs(1), put_handle)
            .await
            .unwrap()
            .unwrap();
        match result {
            Err(PutError::Cancelled(item)) => assert_eq!(item, 2),
            other => panic!("Cancelledが返るべき: {other:?}"),
        }
        assert_eq!(buffer.len(), 1);
    }
}
