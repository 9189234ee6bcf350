//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。各バリアントは sysexits 準拠の終了コードに対応する。

use std::time::Duration;

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 引数不正（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("Environment error: {0}")]
    Env(String),
    /// 設定ファイルの内容が不正
    #[error("Configuration error: {0}")]
    Config(String),
    /// 生成バックエンドに到達できない、または不正な応答
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
    /// 生成バックエンドの応答が期限内に返らなかった
    #[error("Backend timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    /// 状態遷移の契約違反（終了済みセッションへの操作など）
    #[error("Invalid state: {0}")]
    InvalidState(String),
    /// テンプレートのプレースホルダに値が束縛されていない
    #[error("Missing template variable: {0}")]
    MissingVariable(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP / トランスポート層の失敗
    pub fn http(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn missing_variable(name: impl Into<String>) -> Self {
        Self::MissingVariable(name.into())
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// インフラ障害（バックエンド停止・タイムアウト）か。コンテンツ起因の失敗とは区別する。
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_) | Self::Timeout(_))
    }

    /// プロセス終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::Json(_) => 65,
            Self::BackendUnavailable(_) | Self::Timeout(_) => 69,
            Self::InvalidState(_) | Self::MissingVariable(_) => 70,
            Self::Io(_) => 74,
            Self::Env(_) | Self::Config(_) => 78,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::invalid_argument("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 64);
        assert!(err.is_usage());

        let err = Error::invalid_state("session terminated");
        assert_eq!(err.exit_code(), 70);
        assert!(!err.is_usage());
    }

    #[test]
    fn test_backend_failure_classification() {
        assert!(Error::http("connection refused").is_backend_failure());
        assert!(Error::Timeout(Duration::from_secs(3)).is_backend_failure());
        assert!(!Error::missing_variable("conversation_history").is_backend_failure());
        assert!(!Error::config("max_retries").is_backend_failure());
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "Backend timed out after 1500ms");
        assert_eq!(err.exit_code(), 69);
    }

    #[test]
    fn test_from_serde_json_error() {
        let e = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = e.into();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.exit_code(), 65);
    }
}
