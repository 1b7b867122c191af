// パイプライン専用のカスタムエラー型定義

use thiserror::Error;

/// パイプライン実行固有のエラー型
///
/// バッファ内部の競合（待機中のクローズなど）はバッファ側で通常の
/// 停止条件に変換されるため、ここには現れない。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("供給源エラー (producer {unit_id}): {source}")]
    SourceError {
        unit_id: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("出力先エラー (consumer {unit_id}): {source}")]
    SinkError {
        unit_id: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("キャンセルエラー: {message}")]
    CancelledError { message: String },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl PipelineError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 供給源エラーの作成
    pub fn source(unit_id: usize, source: anyhow::Error) -> Self {
        Self::SourceError { unit_id, source }
    }

    /// 出力先エラーの作成
    pub fn sink(unit_id: usize, source: anyhow::Error) -> Self {
        Self::SinkError { unit_id, source }
    }

    /// キャンセルエラーの作成
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::CancelledError {
            message: message.into(),
        }
    }

    /// タスクエラーの作成
    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::TaskError { source }
    }
}

/// パイプライン処理の結果型エイリアス
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let error = PipelineError::configuration("容量は1以上である必要があります");
        assert_eq!(
            error.to_string(),
            "設定エラー: 容量は1以上である必要があります"
        );
    }

    #[test]
    fn test_source_error_includes_unit_id() {
        let error = PipelineError::source(2, anyhow::anyhow!("読み込み失敗"));
        let message = error.to_string();
        assert!(message.contains("producer 2"));
        assert!(matches!(error, PipelineError::SourceError { unit_id: 2, .. }));
    }

    #[test]
    fn test_sink_error_includes_unit_id() {
        let error = PipelineError::sink(1, anyhow::anyhow!("書き込み失敗"));
        assert!(error.to_string().contains("consumer 1"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let error = PipelineError::source(0, anyhow::anyhow!("原因エラー"));
        let source = error.source().expect("原因エラーが保持されるべき");
        assert!(source.to_string().contains("原因エラー"));
    }
}
