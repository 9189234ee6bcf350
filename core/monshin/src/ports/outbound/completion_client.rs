//! 生成バックエンドへの単発完了 Outbound ポート
//!
//! プロンプト文字列を渡して生成テキストを受け取るだけの契約。再試行も検証もしない。

use common::error::Error;

/// 単発の完了（プロンプト → 生成テキスト）
///
/// バックエンド停止・不正な応答は `Error::BackendUnavailable`、期限切れは `Error::Timeout` で返す。
pub trait CompletionClient: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, Error>;
}
