//! 患者の基本情報（年齢・性別）
//!
//! どちらも未入力を許す。プロンプトには未入力のまま渡し、レンダラが「不明」に置き換える。

use common::error::Error;
use std::fmt;

/// 受け付ける年齢の上限
pub const MAX_AGE: u8 = 120;

/// 性別（閉じた集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// 日本語表記・英語表記のどちらでも受け付ける
    pub fn parse(s: &str) -> Result<Self, Error> {
        match s.trim().to_lowercase().as_str() {
            "男性" | "男" | "male" | "m" => Ok(Self::Male),
            "女性" | "女" | "female" | "f" => Ok(Self::Female),
            "その他" | "other" => Ok(Self::Other),
            other => Err(Error::invalid_argument(format!(
                "Unknown gender: '{}'. Use 男性, 女性 or その他",
                other
            ))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "男性",
            Self::Female => "女性",
            Self::Other => "その他",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 年齢（0..=MAX_AGE）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age(u8);

impl Age {
    pub fn new(years: u32) -> Result<Self, Error> {
        if years > u32::from(MAX_AGE) {
            return Err(Error::invalid_argument(format!(
                "Age must be between 0 and {}: {}",
                MAX_AGE, years
            )));
        }
        Ok(Self(years as u8))
    }

    pub fn parse(s: &str) -> Result<Self, Error> {
        let years: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::invalid_argument(format!("Invalid age: '{}'", s.trim())))?;
        Self::new(years)
    }

    #[cfg(test)]
    pub fn years(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}歳", self.0)
    }
}

/// 問診開始前に集める基本情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientProfile {
    pub age: Option<Age>,
    pub gender: Option<Gender>,
}

impl PatientProfile {
    pub fn new(age: Option<Age>, gender: Option<Gender>) -> Self {
        Self { age, gender }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_parse() {
        assert_eq!(Gender::parse("男性").unwrap(), Gender::Male);
        assert_eq!(Gender::parse("Female").unwrap(), Gender::Female);
        assert_eq!(Gender::parse(" その他 ").unwrap(), Gender::Other);
        assert!(Gender::parse("unknown").unwrap_err().is_usage());
    }

    #[test]
    fn test_age_bounds() {
        assert_eq!(Age::new(0).unwrap().years(), 0);
        assert_eq!(Age::new(120).unwrap().years(), 120);
        assert!(Age::new(121).is_err());
        assert!(Age::parse("-1").is_err());
        assert!(Age::parse("abc").is_err());
        assert_eq!(Age::parse(" 42 ").unwrap().years(), 42);
    }

    #[test]
    fn test_age_display() {
        assert_eq!(Age::new(35).unwrap().to_string(), "35歳");
    }
}
