// 設定管理のトレイト定義

/// パイプライン実行の設定を抽象化するトレイト
pub trait PipelineConfig: Send + Sync {
    /// 共有バッファの最大容量を取得
    fn capacity(&self) -> usize;

    /// producerユニット数を取得
    fn producer_count(&self) -> usize;

    /// consumerユニット数を取得
    fn consumer_count(&self) -> usize;

    /// 進捗報告を有効にするかどうか
    fn enable_progress_reporting(&self) -> bool;
}
