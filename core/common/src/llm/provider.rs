//! 生成バックエンドのトレイト定義

use crate::error::Error;
use serde_json::Value;

/// 生成バックエンド 1 種類分の変換（プロンプト → リクエスト、レスポンス → テキスト）
///
/// 描画済みのプロンプトを 1 つ送り、完成したテキストを 1 つ受け取る。
/// 呼び出しはブロッキングで、リトライや出力検証はこの層では行わない。
pub trait LlmProvider: Send + Sync {
    /// ログ・エラー表示用の名前
    fn name(&self) -> &str;

    /// 描画済みプロンプトからリクエスト JSON を作る
    fn make_request_payload(&self, prompt: &str) -> Result<Value, Error>;

    /// リクエストを送ってレスポンス本文を返す。到達不能・非 2xx は `Error::BackendUnavailable`。
    fn make_http_request(&self, request_json: &str) -> Result<String, Error>;

    /// レスポンス本文から生成テキストを取り出す。テキストが無ければ None。
    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error>;
}
