//! 境界で受け渡す値の Newtype
//!
//! 設定ディレクトリ・プロファイル名・モデル名を String / PathBuf のまま運ばない。

use std::fmt;
use std::ops::Deref;
use std::path::{Path, PathBuf};

/// 設定ディレクトリ（MONSHIN_HOME など）
///
/// 配下のレイアウト:
/// - profiles.json  生成バックエンドのプロファイル
/// - interview.json 問診ポリシー・検証・テンプレートの設定
/// - logs/monshin.jsonl 構造化ログ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDir(PathBuf);

impl HomeDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn profiles_config_path(&self) -> PathBuf {
        self.0.join("profiles.json")
    }

    pub fn interview_config_path(&self) -> PathBuf {
        self.0.join("interview.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.0.join("logs").join("monshin.jsonl")
    }
}

impl Deref for HomeDir {
    type Target = Path;
    fn deref(&self) -> &Path {
        &self.0
    }
}

/// profiles.json のプロファイル名、またはビルトインのプロバイダ名（`-p`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderName(String);

impl ProviderName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Deref for ProviderName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProviderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// バックエンドに渡すモデル識別子（`-m`、例: qwen3:8b）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName(String);

impl ModelName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Deref for ModelName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
