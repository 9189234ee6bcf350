//! profiles.json の読み込みとプロバイダ解決

use crate::domain::ProviderName;
use crate::error::Error;
use crate::llm::config::ProfilesConfig;
use crate::llm::factory::ProviderType;
use crate::ports::outbound::FileSystem;
use std::path::Path;

/// プロファイル未設定時のプロバイダ
pub const DEFAULT_PROVIDER: &str = "ollama";

/// 解決済みプロバイダ（ProviderType + オプション）
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    /// 解決に使ったプロファイル名（例: "local", "ollama"）。エラー表示用
    pub profile_name: String,
    pub provider_type: ProviderType,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl ResolvedProvider {
    fn builtin(name: &str, provider_type: ProviderType) -> Self {
        Self {
            profile_name: name.to_string(),
            provider_type,
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: None,
            timeout_secs: None,
        }
    }
}

/// profiles.json を読み込む。ファイルが無ければ Ok(None)、JSON が壊れていれば Err（メッセージにパス含める）
pub fn load_profiles_config(
    fs: &dyn FileSystem,
    path: &Path,
) -> Result<Option<ProfilesConfig>, Error> {
    if !fs.exists(path) {
        return Ok(None);
    }
    let contents = fs.read_to_string(path)?;
    ProfilesConfig::parse(&contents)
        .map_err(|e| match e {
            Error::Config(msg) => Error::config(format!("{}: {}", path.display(), msg)),
            Error::Json(msg) => Error::json(format!("{}: {}", path.display(), msg)),
            other => other,
        })
        .map(Some)
}

/// 利用可能なビルトインプロバイダ名
pub fn builtin_provider_names() -> &'static [&'static str] {
    &["ollama", "openai", "gpt", "openai_compat", "echo"]
}

/// プロファイル名の一覧（profiles.json + ビルトイン）と既定名
pub fn list_profiles(cfg: Option<&ProfilesConfig>) -> (Vec<String>, String) {
    let mut names: Vec<String> = builtin_provider_names()
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    if let Some(cfg) = cfg {
        let mut custom: Vec<&String> = cfg.providers.keys().collect();
        custom.sort();
        for k in custom {
            if !names.contains(k) {
                names.push(k.clone());
            }
        }
    }
    let default = cfg
        .and_then(|c| c.default_provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    (names, default)
}

/// 要求されたプロバイダ名（None の場合は default）と ProfilesConfig から ResolvedProvider を解決する。
/// 不明なプロバイダの場合は Error::invalid_argument（is_usage == true）で利用可能一覧を返す。
pub fn resolve_provider(
    requested: Option<&ProviderName>,
    cfg: Option<&ProfilesConfig>,
) -> Result<ResolvedProvider, Error> {
    let effective_name: &str = requested.map(|r| r.as_ref()).unwrap_or_else(|| {
        cfg.and_then(|c| c.default_provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER)
    });

    // 1) cfg.providers に名前があればそれを優先
    if let Some(profile) = cfg.and_then(|c| c.providers.get(effective_name)) {
        return Ok(ResolvedProvider {
            profile_name: effective_name.to_string(),
            provider_type: profile.type_,
            base_url: profile.base_url.clone(),
            model: profile.model.clone(),
            api_key_env: profile.api_key_env.clone(),
            temperature: profile.temperature,
            timeout_secs: profile.timeout_secs,
        });
    }

    // 2) ビルトインを試す
    if let Some(provider_type) = ProviderType::parse(effective_name) {
        return Ok(ResolvedProvider::builtin(effective_name, provider_type));
    }

    // 3) どれも無ければ usage エラー
    let (available, _) = list_profiles(cfg);
    Err(Error::invalid_argument(format!(
        "Unknown provider: '{}'. Available: {}",
        effective_name,
        available.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::StdFileSystem;
    use crate::llm::config::ProviderProfile;
    use std::collections::HashMap;

    #[test]
    fn test_resolve_provider_no_cfg_default() {
        let r = resolve_provider(None, None).unwrap();
        assert_eq!(r.profile_name, "ollama");
        assert_eq!(r.provider_type, ProviderType::Ollama);
        assert!(r.model.is_none());
    }

    #[test]
    fn test_resolve_provider_no_cfg_requested_echo() {
        let name = ProviderName::new("echo");
        let r = resolve_provider(Some(&name), None).unwrap();
        assert_eq!(r.provider_type, ProviderType::Echo);
    }

    #[test]
    fn test_resolve_provider_no_cfg_unknown() {
        let name = ProviderName::new("unknown_provider");
        let e = resolve_provider(Some(&name), None).unwrap_err();
        assert!(e.is_usage());
        let msg = e.to_string();
        assert!(msg.contains("Unknown provider"));
        assert!(msg.contains("unknown_provider"));
        assert!(msg.contains("Available"));
    }

    #[test]
    fn test_resolve_provider_cfg_default_provider() {
        let cfg = ProfilesConfig {
            default_provider: Some("clinic".to_string()),
            providers: {
                let mut m = HashMap::new();
                m.insert(
                    "clinic".to_string(),
                    ProviderProfile {
                        type_: ProviderType::Ollama,
                        base_url: Some("http://gpu-box:11434/v1".to_string()),
                        model: Some("qwen3:8b".to_string()),
                        api_key_env: None,
                        temperature: Some(0.3),
                        timeout_secs: Some(90),
                    },
                );
                m
            },
        };
        let r = resolve_provider(None, Some(&cfg)).unwrap();
        assert_eq!(r.profile_name, "clinic");
        assert_eq!(r.provider_type, ProviderType::Ollama);
        assert_eq!(r.base_url.as_deref(), Some("http://gpu-box:11434/v1"));
        assert_eq!(r.model.as_deref(), Some("qwen3:8b"));
        assert_eq!(r.timeout_secs, Some(90));
    }

    #[test]
    fn test_resolve_provider_requested_overrides_default() {
        let cfg = ProfilesConfig {
            default_provider: Some("ollama".to_string()),
            providers: HashMap::new(),
        };
        let name = ProviderName::new("echo");
        let r = resolve_provider(Some(&name), Some(&cfg)).unwrap();
        assert_eq!(r.provider_type, ProviderType::Echo);
    }

    #[test]
    fn test_resolve_provider_unknown_lists_custom_profiles() {
        let cfg = ProfilesConfig {
            default_provider: None,
            providers: {
                let mut m = HashMap::new();
                m.insert("my_custom".to_string(), ProviderProfile::default());
                m
            },
        };
        let name = ProviderName::new("nonexistent");
        let msg = resolve_provider(Some(&name), Some(&cfg))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("my_custom"));
        assert!(msg.contains("ollama"));
    }

    #[test]
    fn test_list_profiles_default() {
        let (names, default) = list_profiles(None);
        assert!(names.contains(&"echo".to_string()));
        assert_eq!(default, "ollama");
    }

    #[test]
    fn test_load_profiles_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_profiles_config(&StdFileSystem, &dir.path().join("profiles.json")).unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn test_load_profiles_config_broken_json_mentions_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_profiles_config(&StdFileSystem, &path).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().contains("profiles.json"));
    }
}
