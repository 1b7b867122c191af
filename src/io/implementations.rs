// 供給源・出力先の具象実装

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use super::traits::{ItemSink, ItemSource};

/// 整数範囲を順に生成する供給源（両端含む）
#[derive(Debug, Clone)]
pub struct RangeSource {
    next: i64,
    end: i64,
}

impl RangeSource {
    pub fn new(start: i64, end: i64) -> Self {
        Self { next: start, end }
    }
}

#[async_trait]
impl ItemSource<i64> for RangeSource {
    async fn next_item(&mut self) -> Result<Option<i64>> {
        if self.next > self.end {
            return Ok(None);
        }
        let item = self.next;
        self.next += 1;
        Ok(Some(item))
    }
}

/// Vecの内容を先頭から順に供給する供給源
#[derive(Debug)]
pub struct VecSource<T> {
    items: VecDeque<T>,
}

impl<T> VecSource<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: items.into(),
        }
    }
}

#[async_trait]
impl<T: Send + 'static> ItemSource<T> for VecSource<T> {
    async fn next_item(&mut self) -> Result<Option<T>> {
        Ok(self.items.pop_front())
    }
}

/// メモリ内に蓄積する出力先
///
/// 内部ストアは共有ハンドル経由なので、cloneを手元に残しておけば
/// 実行完了後（またはsinkがユニットへ移動した後）でも内容を読み出せる。
#[derive(Debug, Clone)]
pub struct CollectingSink<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for CollectingSink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CollectingSink<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// 蓄積されたアイテム数
    pub fn len(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> CollectingSink<T> {
    /// 蓄積されたアイテムのコピーを取得
    pub fn items(&self) -> Vec<T> {
        self.items.lock().unwrap().clone()
    }
}

#[async_trait]
impl<T: Send + 'static> ItemSink<T> for CollectingSink<T> {
    async fn accept(&mut self, item: T) -> Result<()> {
        self.items.lock().unwrap().push(item);
        Ok(())
    }
}

/// 件数のみを数える出力先（ストレステスト・ベンチマーク用）
#[derive(Debug, Clone, Default)]
pub struct CountingSink {
    count: Arc<AtomicUsize>,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Send + 'static> ItemSink<T> for CountingSink {
    async fn accept(&mut self, _item: T) -> Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
