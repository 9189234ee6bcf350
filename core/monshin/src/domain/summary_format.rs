//! サマリーの書式

use common::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    /// Subjective / Objective / Assessment / Plan の 4 項目
    #[default]
    Soap,
    /// 現病歴（History of Present Illness）の叙述
    Hpi,
}

impl SummaryFormat {
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "soap" => Ok(Self::Soap),
            "hpi" => Ok(Self::Hpi),
            other => Err(Error::invalid_argument(format!(
                "unknown summary format: '{}' (expected soap or hpi)",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soap => "soap",
            Self::Hpi => "hpi",
        }
    }
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(SummaryFormat::parse("SOAP").unwrap(), SummaryFormat::Soap);
        assert_eq!(SummaryFormat::parse(" hpi ").unwrap(), SummaryFormat::Hpi);
        assert!(SummaryFormat::parse("narrative").unwrap_err().is_usage());
    }
}
