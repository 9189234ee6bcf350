//! プロバイダファクトリー
//!
//! プロバイダタイプに基づいて適切なプロバイダを作成します。

use crate::error::Error;
use crate::llm::echo::EchoProvider;
use crate::llm::openai_compat::OpenAiCompatProvider;
use crate::llm::provider::LlmProvider;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.1";
const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// プロバイダ種別（profiles.json の "type"）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ProviderType {
    /// ローカル Ollama（OpenAI 互換 /v1 エンドポイント）
    #[default]
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "openai", alias = "gpt")]
    OpenAi,
    /// 任意の /chat/completions 互換エンドポイント
    #[serde(rename = "openai_compat")]
    OpenAiCompat,
    /// 固定応答（API 呼び出しなし）
    #[serde(rename = "echo")]
    Echo,
}

impl ProviderType {
    /// 文字列からプロバイダタイプを解析
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "gpt" | "openai" => Some(Self::OpenAi),
            "openai_compat" => Some(Self::OpenAiCompat),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    /// プロバイダタイプを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAi => "openai",
            Self::OpenAiCompat => "openai_compat",
            Self::Echo => "echo",
        }
    }
}

/// プロバイダのenumラッパー
///
/// 異なるプロバイダタイプを型安全に扱うために使用します。
pub enum AnyProvider {
    OpenAiCompat(OpenAiCompatProvider),
    Echo(EchoProvider),
}

impl LlmProvider for AnyProvider {
    fn name(&self) -> &str {
        match self {
            Self::OpenAiCompat(p) => p.name(),
            Self::Echo(p) => p.name(),
        }
    }

    fn make_request_payload(&self, prompt: &str) -> Result<Value, Error> {
        match self {
            Self::OpenAiCompat(p) => p.make_request_payload(prompt),
            Self::Echo(p) => p.make_request_payload(prompt),
        }
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        match self {
            Self::OpenAiCompat(p) => p.make_http_request(request_json),
            Self::Echo(p) => p.make_http_request(request_json),
        }
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        match self {
            Self::OpenAiCompat(p) => p.parse_response_text(response_json),
            Self::Echo(p) => p.parse_response_text(response_json),
        }
    }
}

/// プロバイダを作成する
///
/// # Arguments
/// * `provider_type` - プロバイダタイプ
/// * `model` - モデル名（オプション、デフォルト値が使用される）
/// * `base_url` - ベース URL（None のとき各プロバイダのデフォルト）
/// * `api_key_env` - API キーを読む環境変数名（None のとき各プロバイダのデフォルト）
/// * `temperature` - 温度（None のとき各プロバイダのデフォルト）
/// * `timeout` - HTTP タイムアウト（None のとき無制限）
pub fn create_provider(
    provider_type: ProviderType,
    model: Option<String>,
    base_url: Option<String>,
    api_key_env: Option<String>,
    temperature: Option<f32>,
    timeout: Option<Duration>,
) -> Result<AnyProvider, Error> {
    match provider_type {
        ProviderType::Ollama => {
            let provider = OpenAiCompatProvider::new(
                model.or_else(|| Some(OLLAMA_DEFAULT_MODEL.to_string())),
                base_url.or_else(|| Some(OLLAMA_BASE_URL.to_string())),
                api_key_env,
                temperature,
                timeout,
            )?
            .with_name("ollama");
            Ok(AnyProvider::OpenAiCompat(provider))
        }
        ProviderType::OpenAi => {
            let provider = OpenAiCompatProvider::new(
                model,
                base_url,
                api_key_env.or_else(|| Some(OPENAI_API_KEY_ENV.to_string())),
                temperature,
                timeout,
            )?
            .with_name("openai");
            Ok(AnyProvider::OpenAiCompat(provider))
        }
        ProviderType::OpenAiCompat => {
            let provider =
                OpenAiCompatProvider::new(model, base_url, api_key_env, temperature, timeout)?;
            Ok(AnyProvider::OpenAiCompat(provider))
        }
        ProviderType::Echo => Ok(AnyProvider::Echo(EchoProvider::new())),
    }
}
