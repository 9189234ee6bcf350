//! profiles.json の設定型
//!
//! 例:
//! ```json
//! {
//!   "default_provider": "clinic",
//!   "providers": {
//!     "clinic": { "type": "ollama", "model": "qwen3:8b", "timeout_secs": 120 }
//!   }
//! }
//! ```

use crate::error::Error;
use crate::llm::factory::ProviderType;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilesConfig {
    /// `-p` 未指定時に使うプロファイル名
    #[serde(default, alias = "default")]
    pub default_provider: Option<String>,
    #[serde(default)]
    pub providers: HashMap<String, ProviderProfile>,
}

/// 1 プロファイル分。省略した項目は各プロバイダの既定値になる。
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderProfile {
    #[serde(rename = "type", alias = "provider")]
    pub type_: ProviderType,
    pub base_url: Option<String>,
    #[serde(alias = "default_model")]
    pub model: Option<String>,
    /// API キーを読む環境変数名
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl ProfilesConfig {
    pub fn parse(json: &str) -> Result<Self, Error> {
        let cfg: ProfilesConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), Error> {
        if matches!(&self.default_provider, Some(name) if name.trim().is_empty()) {
            return Err(Error::config("default_provider must not be empty"));
        }
        let mut names: Vec<&String> = self.providers.keys().collect();
        names.sort();
        for name in names {
            let p = &self.providers[name];
            if let Some(t) = p.temperature {
                if !(0.0..=2.0).contains(&t) {
                    return Err(Error::config(format!(
                        "{}: temperature must be between 0.0 and 2.0: {}",
                        name, t
                    )));
                }
            }
            if p.timeout_secs == Some(0) {
                return Err(Error::config(format!("{}: timeout_secs must be at least 1", name)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_object() {
        let cfg = ProfilesConfig::parse("{}").unwrap();
        assert!(cfg.default_provider.is_none());
        assert!(cfg.providers.is_empty());
    }

    #[test]
    fn test_parse_clinic_profiles() {
        let json = r#"
        {
            "default_provider": "clinic",
            "providers": {
                "clinic": { "type": "ollama", "model": "qwen3:8b", "timeout_secs": 120 },
                "cloud": { "type": "openai", "api_key_env": "OPENAI_KEY" },
                "local": { "type": "openai_compat", "base_url": "http://localhost:8080/v1" },
                "dry": { "type": "echo" }
            }
        }
        "#;
        let cfg = ProfilesConfig::parse(json).unwrap();
        assert_eq!(cfg.default_provider.as_deref(), Some("clinic"));
        assert_eq!(cfg.providers.len(), 4);

        let c = &cfg.providers["clinic"];
        assert_eq!(c.type_, ProviderType::Ollama);
        assert_eq!(c.model.as_deref(), Some("qwen3:8b"));
        assert_eq!(c.timeout_secs, Some(120));
        assert_eq!(cfg.providers["cloud"].type_, ProviderType::OpenAi);
        assert_eq!(cfg.providers["local"].type_, ProviderType::OpenAiCompat);
        assert_eq!(cfg.providers["dry"].type_, ProviderType::Echo);
    }

    #[test]
    fn test_parse_aliases() {
        let json = r#"
        {
            "default": "local",
            "providers": {
                "local": { "provider": "gpt", "default_model": "gpt-4o-mini", "temperature": 0.4 }
            }
        }
        "#;
        let cfg = ProfilesConfig::parse(json).unwrap();
        assert_eq!(cfg.default_provider.as_deref(), Some("local"));
        let p = &cfg.providers["local"];
        assert_eq!(p.type_, ProviderType::OpenAi);
        assert_eq!(p.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(p.temperature, Some(0.4));
    }

    #[test]
    fn test_unknown_type_or_field_is_json_error() {
        let unknown_type = r#"{ "providers": { "x": { "type": "gemini" } } }"#;
        assert!(matches!(ProfilesConfig::parse(unknown_type), Err(Error::Json(_))));
        let typo = r#"{ "providers": { "x": { "type": "ollama", "modle": "llama3.1" } } }"#;
        assert!(matches!(ProfilesConfig::parse(typo), Err(Error::Json(_))));
    }

    #[test]
    fn test_out_of_range_values_are_config_errors() {
        let hot = r#"{ "providers": { "x": { "type": "ollama", "temperature": 3.5 } } }"#;
        let err = ProfilesConfig::parse(hot).unwrap_err();
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("x: temperature"));

        let zero = r#"{ "providers": { "x": { "type": "ollama", "timeout_secs": 0 } } }"#;
        assert!(matches!(ProfilesConfig::parse(zero), Err(Error::Config(_))));
    }
}
