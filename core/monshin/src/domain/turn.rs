//! 発話 1 件（Turn）

use std::fmt;

/// 発話者
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Patient,
    Assistant,
}

impl Speaker {
    /// トランスクリプト 1 行の接頭辞
    pub fn label(&self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Assistant => "Assistant",
        }
    }
}

/// 発話 1 件。作成後は不変で、Session だけが生成する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    speaker: Speaker,
    text: String,
    sequence_index: usize,
}

impl Turn {
    pub(crate) fn new(speaker: Speaker, text: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            speaker,
            text: text.into(),
            sequence_index,
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker.label(), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_display() {
        let t = Turn::new(Speaker::Patient, "頭痛があります", 0);
        assert_eq!(t.to_string(), "Patient: 頭痛があります");
        let t = Turn::new(Speaker::Assistant, "いつからですか？", 1);
        assert_eq!(t.to_string(), "Assistant: いつからですか？");
        assert_eq!(t.sequence_index(), 1);
    }
}
