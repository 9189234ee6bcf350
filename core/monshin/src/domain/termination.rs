//! 終了判定（クロージングフレーズの検出）

use serde::{Deserialize, Serialize};

/// 医師への引き継ぎを示す既定のクロージングフレーズ
pub const DEFAULT_CLOSING_PHRASES: &[&str] = &[
    "医師にお伝えします",
    "次は医師にご相談ください",
    "これでインタビューを終了します",
    "医師に見せる内容をまとめます",
];

/// 文の区切りとして扱う文字
const SENTENCE_DELIMITERS: &[char] = &['。', '！', '？', '!', '?', '\n'];

/// クロージングフレーズの照合方法
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingPhraseMatch {
    /// 候補文中のどこかに含まれていれば一致
    #[default]
    Substring,
    /// 最後の文（区切り文字を除き前後空白を除去）がフレーズと完全一致
    #[serde(alias = "final-sentence")]
    FinalSentence,
}

impl ClosingPhraseMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::FinalSentence => "final_sentence",
        }
    }
}

/// クロージングフレーズ検出器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosingDetector {
    phrases: Vec<String>,
    mode: ClosingPhraseMatch,
}

impl ClosingDetector {
    pub fn new<I, S>(phrases: I, mode: ClosingPhraseMatch) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases = phrases
            .into_iter()
            .map(Into::into)
            .map(|p: String| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self { phrases, mode }
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    pub fn mode(&self) -> ClosingPhraseMatch {
        self.mode
    }

    /// 一致したフレーズを返す
    pub fn find(&self, candidate: &str) -> Option<&str> {
        match self.mode {
            ClosingPhraseMatch::Substring => self
                .phrases
                .iter()
                .find(|p| candidate.contains(p.as_str()))
                .map(String::as_str),
            ClosingPhraseMatch::FinalSentence => {
                let last = last_sentence(candidate)?;
                self.phrases
                    .iter()
                    .find(|p| p.as_str() == last)
                    .map(String::as_str)
            }
        }
    }
}

impl Default for ClosingDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CLOSING_PHRASES.iter().copied(), ClosingPhraseMatch::default())
    }
}

fn last_sentence(text: &str) -> Option<&str> {
    text.split(SENTENCE_DELIMITERS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closes(d: &ClosingDetector, candidate: &str) -> bool {
        d.find(candidate).is_some()
    }

    #[test]
    fn test_substring_match_anywhere() {
        let d = ClosingDetector::default();
        assert_eq!(
            d.find("ありがとうございます。医師にお伝えします。"),
            Some("医師にお伝えします")
        );
        assert!(closes(&d, "内容を医師にお伝えしますね"));
        assert!(!closes(&d, "頭痛はいつからですか？"));
    }

    #[test]
    fn test_final_sentence_match() {
        let d = ClosingDetector::new(["医師にお伝えします"], ClosingPhraseMatch::FinalSentence);
        assert!(closes(&d, "わかりました。医師にお伝えします。"));
        assert!(closes(&d, "医師にお伝えします"));
        assert!(!closes(&d, "医師にお伝えしますが、他に症状はありますか？"));
        assert!(!closes(&d, "医師にお伝えします。他に症状はありますか？"));
    }

    #[test]
    fn test_empty_phrases_are_ignored() {
        let d = ClosingDetector::new(["", "  "], ClosingPhraseMatch::Substring);
        assert_eq!(d.phrase_count(), 0);
        assert!(!closes(&d, "なんでも"));
    }

    #[test]
    fn test_empty_candidate_never_closes() {
        let d = ClosingDetector::default();
        assert!(!closes(&d, ""));
        let d = ClosingDetector::new(["終了"], ClosingPhraseMatch::FinalSentence);
        assert!(!closes(&d, "。。"));
    }

    #[test]
    fn test_mode_deserialize() {
        let parse = |s: &str| serde_json::from_str::<ClosingPhraseMatch>(s).ok();
        assert_eq!(parse(r#""substring""#), Some(ClosingPhraseMatch::Substring));
        assert_eq!(parse(r#""final_sentence""#), Some(ClosingPhraseMatch::FinalSentence));
        assert_eq!(parse(r#""final-sentence""#), Some(ClosingPhraseMatch::FinalSentence));
        assert_eq!(parse(r#""exact""#), None);
        assert_eq!(ClosingPhraseMatch::FinalSentence.as_str(), "final_sentence");
    }
}
