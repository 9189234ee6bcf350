//! 単発完了のドライバー
//!
//! ペイロード生成 → HTTP → テキスト抽出をプロバイダに依らず 1 本にまとめる。

use crate::error::Error;
use crate::llm::provider::LlmProvider;

pub struct LlmDriver<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> LlmDriver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// プロンプトを 1 つ送り、生成テキストを返す
    ///
    /// 応答にテキストが無いときも `BackendUnavailable` とする（空文字列は呼び出し側の判断に任せる）。
    pub fn complete(&self, prompt: &str) -> Result<String, Error> {
        let payload = self.provider.make_request_payload(prompt)?;
        let request_json = serde_json::to_string(&payload)
            .map_err(|e| Error::json(format!("Failed to serialize request: {}", e)))?;
        let response_json = self.provider.make_http_request(&request_json)?;
        self.provider
            .parse_response_text(&response_json)?
            .ok_or_else(|| Error::http(format!("{}: no text in response", self.provider.name())))
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}
