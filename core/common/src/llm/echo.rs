//! Echo プロバイダ
//!
//! バックエンドを呼ばずに固定の質問文を返す。Ollama が無い環境での動作確認用。

use crate::error::Error;
use crate::llm::provider::LlmProvider;
use serde_json::{json, Value};

/// 返す質問文（検証を通る日本語のみ）
pub const ECHO_REPLY: &str = "その症状はいつから続いていますか？";

#[derive(Debug, Clone, Default)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn make_request_payload(&self, prompt: &str) -> Result<Value, Error> {
        Ok(json!({ "prompt": prompt, "prompt_chars": prompt.chars().count() }))
    }

    // リクエストをそのまま返す
    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        Ok(request_json.to_string())
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v: Value = serde_json::from_str(response_json)?;
        Ok(v.get("prompt").map(|_| ECHO_REPLY.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmDriver;

    #[test]
    fn test_payload_counts_characters() {
        let payload = EchoProvider::new().make_request_payload("頭痛です").unwrap();
        assert_eq!(payload["prompt"], "頭痛です");
        assert_eq!(payload["prompt_chars"], 4);
    }

    #[test]
    fn test_round_trip_through_driver_gives_fixed_reply() {
        let driver = LlmDriver::new(EchoProvider::new());
        assert_eq!(driver.complete("何でも").unwrap(), ECHO_REPLY);
    }

    #[test]
    fn test_body_without_prompt_has_no_text() {
        assert_eq!(EchoProvider::new().parse_response_text("{}").unwrap(), None);
    }
}
