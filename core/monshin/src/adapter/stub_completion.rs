//! テスト用: 台本どおりに応答する CompletionClient


#[cfg(test)]
pub use stub::ScriptedCompletion;
