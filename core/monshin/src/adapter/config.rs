//! interview.json の読み込み（adapter 層）
//!
//! すべての項目は省略可能で、省略時は既定値になる。値の妥当性は読み込み時に検証する。

use crate::domain::policy::{InterviewPolicy, DEFAULT_UNKNOWN_MARKER};
use crate::domain::template::{PromptTemplates, TemplateName};
use crate::domain::termination::{ClosingPhraseMatch, DEFAULT_CLOSING_PHRASES};
use crate::domain::validation::{
    language_ranges, ScriptRange, ValidatorPolicy, DEFAULT_ALLOWED_FOREIGN_TOKENS,
};
use crate::domain::SummaryFormat;
use common::error::Error;
use common::ports::outbound::FileSystem;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// テンプレート差し替えファイルのパス（相対パスは設定ファイルのディレクトリ基準）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatePaths {
    pub interview: Option<PathBuf>,
    pub diagnosis: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

/// 解決済みの問診設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewConfig {
    pub model_identifier: Option<String>,
    pub policy: InterviewPolicy,
    pub validator: ValidatorPolicy,
    pub closing_phrases: Vec<String>,
    pub closing_phrase_match: ClosingPhraseMatch,
    pub unknown_marker: String,
    pub summary_format: SummaryFormat,
    pub completion_timeout: Option<Duration>,
    pub retry_delay: Duration,
    pub templates: TemplatePaths,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            model_identifier: None,
            policy: InterviewPolicy::default(),
            validator: ValidatorPolicy::japanese(DEFAULT_ALLOWED_FOREIGN_TOKENS.iter().copied()),
            closing_phrases: DEFAULT_CLOSING_PHRASES.iter().map(|s| s.to_string()).collect(),
            closing_phrase_match: ClosingPhraseMatch::default(),
            unknown_marker: DEFAULT_UNKNOWN_MARKER.to_string(),
            summary_format: SummaryFormat::default(),
            completion_timeout: None,
            retry_delay: Duration::ZERO,
            templates: TemplatePaths::default(),
        }
    }
}

impl InterviewConfig {
    /// JSON 文字列から読み込む
    pub fn parse(contents: &str) -> Result<Self, Error> {
        let raw: InterviewConfigRaw = serde_json::from_str(contents)
            .map_err(|e| Error::config(e.to_string()))?;
        let cfg = raw.into_config()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.policy.validate()?;
        self.validator.validate()?;
        if self.unknown_marker.trim().is_empty() {
            return Err(Error::config("unknown_marker must not be empty"));
        }
        if matches!(self.completion_timeout, Some(d) if d.is_zero()) {
            return Err(Error::config("completion_timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InterviewConfigRaw {
    #[serde(alias = "model")]
    model_identifier: Option<String>,
    max_retries: Option<usize>,
    max_turns: Option<usize>,
    allowed_foreign_tokens: Option<Vec<String>>,
    #[serde(alias = "target_script_ranges")]
    target_script: Option<TargetScriptRaw>,
    closing_phrases: Option<Vec<String>>,
    closing_phrase_match: Option<ClosingPhraseMatch>,
    opening_question: Option<String>,
    closing_message: Option<String>,
    system_error_message: Option<String>,
    unknown_marker: Option<String>,
    summary_format: Option<SummaryFormat>,
    completion_timeout_secs: Option<u64>,
    retry_delay_ms: Option<u64>,
    templates: Option<TemplatePathsRaw>,
}

/// "ja" のような言語識別子か、範囲の配列
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TargetScriptRaw {
    Language(String),
    Ranges(Vec<ScriptRangeRaw>),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptRangeRaw {
    start: String,
    end: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplatePathsRaw {
    interview: Option<PathBuf>,
    diagnosis: Option<PathBuf>,
    summary: Option<PathBuf>,
}

impl InterviewConfigRaw {
    fn into_config(self) -> Result<InterviewConfig, Error> {
        let mut cfg = InterviewConfig::default();
        cfg.model_identifier = self.model_identifier.filter(|m| !m.trim().is_empty());
        if let Some(n) = self.max_retries {
            cfg.policy.max_retries = n;
        }
        if let Some(n) = self.max_turns {
            cfg.policy.max_turns = n;
        }
        if let Some(s) = self.opening_question {
            cfg.policy.opening_question = s;
        }
        if let Some(s) = self.closing_message {
            cfg.policy.closing_message = s;
        }
        if let Some(s) = self.system_error_message {
            cfg.policy.system_error_message = s;
        }
        if let Some(tokens) = self.allowed_foreign_tokens {
            cfg.validator.allowed_foreign_tokens = tokens.into_iter().collect();
        }
        if let Some(target) = self.target_script {
            cfg.validator.target_ranges = match target {
                TargetScriptRaw::Language(lang) => language_ranges(&lang)?,
                TargetScriptRaw::Ranges(ranges) => ranges
                    .iter()
                    .map(|r| {
                        ScriptRange::new(
                            ScriptRange::parse_code_point(&r.start)?,
                            ScriptRange::parse_code_point(&r.end)?,
                        )
                    })
                    .collect::<Result<Vec<_>, Error>>()?,
            };
        }
        if let Some(phrases) = self.closing_phrases {
            cfg.closing_phrases = phrases;
        }
        if let Some(m) = self.closing_phrase_match {
            cfg.closing_phrase_match = m;
        }
        if let Some(s) = self.unknown_marker {
            cfg.unknown_marker = s;
        }
        if let Some(f) = self.summary_format {
            cfg.summary_format = f;
        }
        cfg.completion_timeout = self.completion_timeout_secs.map(Duration::from_secs);
        if let Some(ms) = self.retry_delay_ms {
            cfg.retry_delay = Duration::from_millis(ms);
        }
        if let Some(t) = self.templates {
            cfg.templates = TemplatePaths {
                interview: t.interview,
                diagnosis: t.diagnosis,
                summary: t.summary,
            };
        }
        Ok(cfg)
    }
}

/// interview.json を読み込む。ファイルが無ければ既定値、壊れていれば Err（メッセージにパスを含める）
pub fn load_interview_config(fs: &dyn FileSystem, path: &Path) -> Result<InterviewConfig, Error> {
    if !fs.exists(path) {
        return Ok(InterviewConfig::default());
    }
    let contents = fs
        .read_to_string(path)
        .map_err(|e| Error::io_msg(format!("{}: {}", path.display(), e)))?;
    InterviewConfig::parse(&contents).map_err(|e| match e {
        Error::Config(msg) => Error::config(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// 組み込みテンプレートに差し替えファイルを重ねる
pub fn load_templates(
    fs: &dyn FileSystem,
    cfg: &InterviewConfig,
    base_dir: &Path,
) -> Result<PromptTemplates, Error> {
    let mut templates = PromptTemplates::builtin(cfg.summary_format);
    let overrides = [
        (TemplateName::Interview, &cfg.templates.interview),
        (TemplateName::Diagnosis, &cfg.templates.diagnosis),
        (TemplateName::Summary, &cfg.templates.summary),
    ];
    for (name, path) in overrides {
        let Some(path) = path else { continue };
        let full = if path.is_absolute() {
            path.clone()
        } else {
            base_dir.join(path)
        };
        let body = fs
            .read_to_string(&full)
            .map_err(|e| Error::config(format!("{} template {}: {}", name, full.display(), e)))?;
        templates.set(name, body);
    }
    Ok(templates)
}
