//! 単発完了の標準実装（common::llm の LlmDriver を使う）

use common::error::Error;
use common::llm::{AnyProvider, LlmDriver, LlmProvider};

use crate::ports::outbound::CompletionClient;

/// プロファイルから作ったプロバイダで 1 回問い合わせる
pub struct LlmDriverCompletion {
    driver: LlmDriver<AnyProvider>,
}

impl LlmDriverCompletion {
    pub fn new(provider: AnyProvider) -> Self {
        Self {
            driver: LlmDriver::new(provider),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.driver.provider().name()
    }
}

impl CompletionClient for LlmDriverCompletion {
    fn complete(&self, prompt: &str) -> Result<String, Error> {
        self.driver.complete(prompt)
    }
}
