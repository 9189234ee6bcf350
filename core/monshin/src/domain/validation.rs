//! 出力バリデータ
//!
//! 生成された質問文を「対象言語の文字」「数字」「ラテン英数字」の連続区間に分割し、
//! 対象言語でも数字でも許可リストの略語でもない区間を不正とする。
//!
//! 区間の境界:
//! - ラテン英数字は `[0-9A-Za-z]`（全角英数字を含む）の最長一致。数字だけなら数字区間。
//!   ハイフン・空白・記号で区切られるため "X-ray" は "X" と "ray" の 2 区間になる。
//! - 対象言語の文字範囲に属する文字の最長一致は対象言語区間。
//! - 上記以外の文字（他言語の字母・数字）の最長一致は外国語区間で、常に不正。
//! - 空白・ASCII 記号・絵文字などはどの区間にも属さない。
//!
//! 許可リストとの照合は全角英数字を半角に正規化したうえで大文字小文字を区別して行う。

use common::error::Error;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

/// 既定の許可リスト（臨床でよく使う略語と単位）
pub const DEFAULT_ALLOWED_FOREIGN_TOKENS: &[&str] = &[
    "CT", "MRI", "PCR", "BMI", "ECG", "EKG", "CRP", "HbA1c", "COVID", "ICU", "ER", "PET", "SpO2",
    "mg", "ml", "mL", "kg", "cm", "mm", "g", "L",
];

/// 全角英数字（０-９, Ａ-Ｚ, ａ-ｚ）
const FULLWIDTH_ALNUM: &str = r"\x{FF10}-\x{FF19}\x{FF21}-\x{FF3A}\x{FF41}-\x{FF5A}";

/// Unicode コードポイントの閉区間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRange {
    start: u32,
    end: u32,
}

impl ScriptRange {
    pub fn new(start: u32, end: u32) -> Result<Self, Error> {
        if start > end {
            return Err(Error::config(format!(
                "script range start U+{:04X} is after end U+{:04X}",
                start, end
            )));
        }
        if char::from_u32(start).is_none() || char::from_u32(end).is_none() {
            return Err(Error::config(format!(
                "script range U+{:04X}-U+{:04X} is not a valid character range",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// "U+3040" / "0x3040" / "3040" 形式のコードポイントを読む
    pub fn parse_code_point(s: &str) -> Result<u32, Error> {
        let t = s.trim();
        let hex = t
            .strip_prefix("U+")
            .or_else(|| t.strip_prefix("u+"))
            .or_else(|| t.strip_prefix("0x"))
            .or_else(|| t.strip_prefix("0X"))
            .unwrap_or(t);
        u32::from_str_radix(hex, 16)
            .map_err(|_| Error::config(format!("invalid code point: '{}'", s)))
    }

    fn to_class_item(self) -> String {
        if self.start == self.end {
            format!("\\x{{{:X}}}", self.start)
        } else {
            format!("\\x{{{:X}}}-\\x{{{:X}}}", self.start, self.end)
        }
    }
}

const JAPANESE_RANGES: &[(u32, u32)] = &[
    (0x3000, 0x303F), // CJK 記号・句読点（々〆を含む）
    (0x3040, 0x309F), // ひらがな
    (0x30A0, 0x30FF), // カタカナ
    (0x31F0, 0x31FF), // カタカナ拡張
    (0x3400, 0x4DBF), // CJK 統合漢字拡張 A
    (0x4E00, 0x9FFF), // CJK 統合漢字
    (0xF900, 0xFAFF), // CJK 互換漢字
    (0xFF61, 0xFF9F), // 半角カナ
];

fn ranges(pairs: &[(u32, u32)]) -> Vec<ScriptRange> {
    pairs
        .iter()
        .map(|&(start, end)| ScriptRange { start, end })
        .collect()
}

/// 言語識別子から対象言語の文字範囲を返す
pub fn language_ranges(language: &str) -> Result<Vec<ScriptRange>, Error> {
    match language.trim().to_lowercase().as_str() {
        "ja" | "japanese" => Ok(ranges(JAPANESE_RANGES)),
        "zh" | "chinese" => Ok(ranges(&[
            (0x3000, 0x303F),
            (0x3100, 0x312F),
            (0x3400, 0x4DBF),
            (0x4E00, 0x9FFF),
            (0xF900, 0xFAFF),
        ])),
        "ko" | "korean" => Ok(ranges(&[
            (0x1100, 0x11FF),
            (0x3000, 0x303F),
            (0x3130, 0x318F),
            (0xAC00, 0xD7AF),
        ])),
        other => Err(Error::config(format!(
            "unknown target language: '{}' (supported: ja, zh, ko)",
            other
        ))),
    }
}

/// 区間の種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentClass {
    Target,
    Numeric,
    Latin,
    Foreign,
}

/// 連続区間 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub class: SegmentClass,
}

/// バリデーション結果。不正区間が無ければ合格。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationVerdict {
    invalid_segments: Vec<String>,
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        self.invalid_segments.is_empty()
    }

    /// 不正区間（出現順、原文どおり）
    pub fn invalid_segments(&self) -> &[String] {
        &self.invalid_segments
    }
}

impl fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            f.write_str("pass")
        } else {
            write!(f, "fail: {}", self.invalid_segments.join(", "))
        }
    }
}

/// バリデータの設定（対象言語の文字範囲と外来語の許可リスト）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorPolicy {
    pub target_ranges: Vec<ScriptRange>,
    pub allowed_foreign_tokens: BTreeSet<String>,
}

impl ValidatorPolicy {
    pub fn japanese<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_ranges: ranges(JAPANESE_RANGES),
            allowed_foreign_tokens: allowed.into_iter().map(Into::into).collect(),
        }
    }

    /// 文字範囲が空でないこと、許可リストの各語が 1 つのラテン英数字区間であることを確かめる
    ///
    /// "X-ray" や "Covid 19" は区切り文字で複数区間に分かれるため、
    /// 許可リストに載せても決して一致しない。黙って無視せず設定エラーにする。
    pub fn validate(&self) -> Result<(), Error> {
        if self.target_ranges.is_empty() {
            return Err(Error::config("target script ranges must not be empty"));
        }
        for token in &self.allowed_foreign_tokens {
            check_allowed_token(token)?;
        }
        Ok(())
    }
}

/// 許可リストの 1 語は `[0-9A-Za-z]`（全角英数字を含む）だけで書かれていること
pub fn check_allowed_token(token: &str) -> Result<(), Error> {
    if token.is_empty() {
        return Err(Error::config("allowed_foreign_tokens must not contain an empty entry"));
    }
    if let Some(c) = token.chars().find(|&c| !is_latin_alnum(c)) {
        return Err(Error::config(format!(
            "allowed_foreign_tokens entry '{}' contains '{}' and can never match; \
             entries must be a single run of letters and digits",
            token, c
        )));
    }
    Ok(())
}

fn is_latin_alnum(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c as u32, 0xFF10..=0xFF19 | 0xFF21..=0xFF3A | 0xFF41..=0xFF5A)
}

/// 出力バリデータ（状態を持たない純粋関数の集まり）
#[derive(Debug, Clone)]
pub struct OutputValidator {
    tokenizer: Regex,
    allowed: BTreeSet<String>,
}

impl OutputValidator {
    pub fn new(policy: ValidatorPolicy) -> Result<Self, Error> {
        policy.validate()?;
        let target: String = policy
            .target_ranges
            .iter()
            .map(|r| r.to_class_item())
            .collect();
        let alnum = format!("0-9A-Za-z{}", FULLWIDTH_ALNUM);
        let pattern = format!(
            concat!(
                r"(?P<target>[{t}]+)",
                r"|(?P<alnum>[{a}]+)",
                r"|(?P<foreign>[\p{{L}}\p{{M}}\p{{Nd}}--[{t}{a}]]+)",
            ),
            t = target,
            a = alnum
        );
        let tokenizer = Regex::new(&pattern)
            .map_err(|e| Error::config(format!("invalid script ranges: {}", e)))?;
        let allowed = policy
            .allowed_foreign_tokens
            .iter()
            .map(|t| normalize_fullwidth(t))
            .collect();
        Ok(Self { tokenizer, allowed })
    }

    /// テキストを区間に分割する
    pub fn segments(&self, text: &str) -> Vec<Segment> {
        self.tokenizer
            .captures_iter(text)
            .filter_map(|caps| {
                if let Some(m) = caps.name("target") {
                    return Some(Segment {
                        text: m.as_str().to_string(),
                        class: SegmentClass::Target,
                    });
                }
                if let Some(m) = caps.name("alnum") {
                    let normalized = normalize_fullwidth(m.as_str());
                    let class = if normalized.chars().all(|c| c.is_ascii_digit()) {
                        SegmentClass::Numeric
                    } else {
                        SegmentClass::Latin
                    };
                    return Some(Segment {
                        text: m.as_str().to_string(),
                        class,
                    });
                }
                caps.name("foreign").map(|m| Segment {
                    text: m.as_str().to_string(),
                    class: SegmentClass::Foreign,
                })
            })
            .collect()
    }

    /// 許可リストに完全一致するか（全角英数字は半角にして比較）
    pub fn is_allowed(&self, token: &str) -> bool {
        self.allowed.contains(&normalize_fullwidth(token))
    }

    pub fn validate(&self, text: &str) -> ValidationVerdict {
        let invalid_segments = self
            .segments(text)
            .into_iter()
            .filter(|seg| match seg.class {
                SegmentClass::Target | SegmentClass::Numeric => false,
                SegmentClass::Latin => !self.is_allowed(&seg.text),
                SegmentClass::Foreign => true,
            })
            .map(|seg| seg.text)
            .collect();
        ValidationVerdict { invalid_segments }
    }
}

/// 全角 ASCII（U+FF01..U+FF5E）を半角へ
fn normalize_fullwidth(s: &str) -> String {
    s.chars()
        .map(|c| match c as u32 {
            0xFF01..=0xFF5E => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(allowed: &[&str]) -> OutputValidator {
        OutputValidator::new(ValidatorPolicy::japanese(allowed.iter().copied())).unwrap()
    }

    #[test]
    fn test_japanese_only_passes() {
        let v = validator(&[]);
        assert!(v.validate("頭痛はいつから続いていますか？").is_valid());
        assert!(v.validate("カタカナとひらがな、漢字。々〆ー").is_valid());
    }

    #[test]
    fn test_empty_string_passes() {
        let v = validator(&[]);
        let verdict = v.validate("");
        assert!(verdict.is_valid());
        assert!(verdict.invalid_segments().is_empty());
    }

    #[test]
    fn test_allow_listed_acronym_passes() {
        let v = validator(&["CT"]);
        assert!(v.validate("CT検査が必要です").is_valid());
    }

    #[test]
    fn test_x_ray_splits_on_hyphen() {
        let v = validator(&["MRI"]);
        let verdict = v.validate("MRI検査とX-rayが必要です");
        assert!(!verdict.is_valid());
        assert_eq!(verdict.invalid_segments(), &["X".to_string(), "ray".to_string()]);
    }

    #[test]
    fn test_non_allow_listed_latin_fails() {
        let v = validator(&["CT"]);
        let verdict = v.validate("headache はありますか？");
        assert_eq!(verdict.invalid_segments(), &["headache".to_string()]);
    }

    #[test]
    fn test_numbers_pass() {
        let v = validator(&[]);
        assert!(v.validate("体温は37.5度ですか？３日前からですか？").is_valid());
    }

    #[test]
    fn test_alphanumeric_token_must_match_whole() {
        let v = validator(&["HbA1c"]);
        assert!(v.validate("HbA1cの値はわかりますか？").is_valid());
        let verdict = v.validate("HbA1c2の値");
        assert_eq!(verdict.invalid_segments(), &["HbA1c2".to_string()]);
    }

    #[test]
    fn test_allow_list_is_case_sensitive() {
        let v = validator(&["CT"]);
        let verdict = v.validate("ct検査");
        assert_eq!(verdict.invalid_segments(), &["ct".to_string()]);
    }

    #[test]
    fn test_fullwidth_latin_normalized_for_allow_list() {
        let v = validator(&["CT"]);
        assert!(v.validate("ＣＴ検査を受けましたか？").is_valid());
    }

    #[test]
    fn test_foreign_script_fails() {
        let v = validator(&[]);
        let verdict = v.validate("痛みは어디ですか？");
        assert_eq!(verdict.invalid_segments(), &["어디".to_string()]);
        let verdict = v.validate("Как дела");
        assert_eq!(verdict.invalid_segments().len(), 2);
    }

    #[test]
    fn test_punctuation_and_emoji_are_neutral() {
        let v = validator(&[]);
        assert!(v.validate("はい!? (確認) 😊 ...").is_valid());
    }

    #[test]
    fn test_segments_classes() {
        let v = validator(&[]);
        let segs = v.segments("CT検査3回");
        let classes: Vec<SegmentClass> = segs.iter().map(|s| s.class).collect();
        assert_eq!(
            classes,
            vec![
                SegmentClass::Latin,
                SegmentClass::Target,
                SegmentClass::Numeric,
                SegmentClass::Target
            ]
        );
    }

    #[test]
    fn test_language_ranges() {
        assert!(language_ranges("ja").is_ok());
        assert!(language_ranges("KO").is_ok());
        assert!(matches!(language_ranges("xx"), Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_ranges_korean_target() {
        let policy = ValidatorPolicy {
            target_ranges: language_ranges("ko").unwrap(),
            allowed_foreign_tokens: BTreeSet::new(),
        };
        let v = OutputValidator::new(policy).unwrap();
        assert!(v.validate("어디가 아프세요?").is_valid());
        assert!(!v.validate("どこが痛いですか").is_valid());
    }

    #[test]
    fn test_script_range_parse_and_validate() {
        assert_eq!(ScriptRange::parse_code_point("U+3040").unwrap(), 0x3040);
        assert_eq!(ScriptRange::parse_code_point("0x30ff").unwrap(), 0x30FF);
        assert!(ScriptRange::parse_code_point("zz").is_err());
        assert!(ScriptRange::new(0x30FF, 0x3040).is_err());
        assert!(ScriptRange::new(0xD800, 0xD8FF).is_err());
        assert!(ScriptRange::new(0x3040, 0x309F).is_ok());
    }

    #[test]
    fn test_empty_ranges_rejected() {
        let policy = ValidatorPolicy {
            target_ranges: Vec::new(),
            allowed_foreign_tokens: BTreeSet::new(),
        };
        assert!(OutputValidator::new(policy).is_err());
    }

    #[test]
    fn test_multi_segment_allow_list_entries_rejected() {
        for entry in ["X-ray", "Covid 19", "SpO₂", "", "ＣＴ検査"] {
            let policy = ValidatorPolicy::japanese([entry]);
            let err = OutputValidator::new(policy).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "entry {:?}", entry);
            assert_eq!(err.exit_code(), 78);
        }
    }

    #[test]
    fn test_single_run_allow_list_entries_accepted() {
        for entry in ["CT", "HbA1c", "SpO2", "ＭＲＩ", "19"] {
            assert!(check_allowed_token(entry).is_ok(), "entry {:?}", entry);
        }
        assert!(ValidatorPolicy::japanese(DEFAULT_ALLOWED_FOREIGN_TOKENS.iter().copied())
            .validate()
            .is_ok());
    }

    #[test]
    fn test_verdict_display() {
        let v = validator(&["MRI"]);
        assert_eq!(v.validate("MRI検査").to_string(), "pass");
        assert_eq!(v.validate("X-ray").to_string(), "fail: X, ray");
    }
}
