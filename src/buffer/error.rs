// バッファ操作の失敗を表すエラー型定義

use thiserror::Error;

/// putの失敗。拒否されたアイテムは呼び出し側へ返却される
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PutError<T> {
    /// クローズ済みバッファへのput。シャットダウン競合として想定内であり、
    /// producerは停止シグナルとして扱う
    #[error("バッファはクローズ済みです")]
    Closed(T),

    /// 待機中にキャンセルされた。バッファ状態は変更されていない
    #[error("putがキャンセルされました")]
    Cancelled(T),
}

impl<T> PutError<T> {
    /// 拒否されたアイテムを取り戻す
    pub fn into_item(self) -> T {
        match self {
            Self::Closed(item) | Self::Cancelled(item) => item,
        }
    }
}

/// takeの失敗
///
/// クローズ後の排出完了は正常な終端シグナル（`Ok(None)`）であり
/// エラーではないため、ここにはキャンセルのみが現れる。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TakeError {
    /// 待機中にキャンセルされた。バッファ状態は変更されていない
    #[error("takeがキャンセルされました")]
    Cancelled,
}
