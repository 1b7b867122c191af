// 供給源・出力先のトレイト定義
// producer/consumerユニットが接続する外部コラボレーターの抽象化

use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

/// producerが引き出すアイテム供給源のトレイト
///
/// 純粋なプル型インターフェース。遅延生成される有限または無限の
/// シーケンスを表し、それ自体に並行性の要件はない（所有ユニットの
/// タスクからのみ呼ばれる）。
#[automock]
#[async_trait]
pub trait ItemSource<T: 'static + Send>: Send {
    /// 次のアイテムを取り出す。供給源が尽きたら`None`
    async fn next_item(&mut self) -> Result<Option<T>>;
}

/// consumerがアイテムを転送する出力先のトレイト
///
/// 消費された各アイテムについて一度ずつ呼ばれる。所有ユニットの
/// タスクからのみ呼ばれるため、ユニット間の共有安全性は要求しない。
#[automock]
#[async_trait]
pub trait ItemSink<T: 'static + Send>: Send {
    /// アイテムを1つ受け入れる
    async fn accept(&mut self, item: T) -> Result<()>;
}

// Box<dyn ItemSource<T>>への転送実装
#[async_trait]
impl<T: Send + 'static> ItemSource<T> for Box<dyn ItemSource<T>> {
    async fn next_item(&mut self) -> Result<Option<T>> {
        self.as_mut().next_item().await
    }
}

// Box<dyn ItemSink<T>>への転送実装
#[async_trait]
impl<T: Send + 'static> ItemSink<T> for Box<dyn ItemSink<T>> {
    async fn accept(&mut self, item: T) -> Result<()> {
        self.as_mut().accept(item).await
    }
}
