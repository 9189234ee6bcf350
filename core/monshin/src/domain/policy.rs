//! 問診の進行ルール（上限と固定メッセージ）

use common::error::Error;

pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_MAX_TURNS: usize = 30;
pub const DEFAULT_OPENING_QUESTION: &str = "本日どのような症状がありますか？";
pub const DEFAULT_CLOSING_MESSAGE: &str = "ご協力ありがとうございました。次は医師の診察になります。";
pub const DEFAULT_SYSTEM_ERROR_MESSAGE: &str =
    "申し訳ありません。システムの都合で質問を作成できませんでした。もう一度お答えいただけますか？";
pub const DEFAULT_UNKNOWN_MARKER: &str = "不明";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewPolicy {
    pub max_retries: usize,
    pub max_turns: usize,
    pub opening_question: String,
    pub closing_message: String,
    pub system_error_message: String,
}

impl InterviewPolicy {
    /// 上限が 0 のポリシーは拒否する
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_retries == 0 {
            return Err(Error::config("max_retries must be at least 1"));
        }
        if self.max_turns == 0 {
            return Err(Error::config("max_turns must be at least 1"));
        }
        for (name, text) in [
            ("opening_question", &self.opening_question),
            ("closing_message", &self.closing_message),
            ("system_error_message", &self.system_error_message),
        ] {
            if text.trim().is_empty() {
                return Err(Error::config(format!("{} must not be empty", name)));
            }
        }
        Ok(())
    }
}

impl Default for InterviewPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            max_turns: DEFAULT_MAX_TURNS,
            opening_question: DEFAULT_OPENING_QUESTION.to_string(),
            closing_message: DEFAULT_CLOSING_MESSAGE.to_string(),
            system_error_message: DEFAULT_SYSTEM_ERROR_MESSAGE.to_string(),
        }
    }
}
