//! 生成バックエンド（Ollama / OpenAI 互換、Echo）
//!
//! profiles.json でプロバイダを選び、描画済みプロンプト 1 つに対して生成テキスト 1 つを得る。

pub mod config;
pub mod driver;
pub mod echo;
pub mod factory;
pub mod openai_compat;
pub mod provider;
pub mod resolver;

pub use driver::LlmDriver;
pub use factory::{create_provider, AnyProvider, ProviderType};
pub use provider::LlmProvider;
pub use resolver::{load_profiles_config, resolve_provider, ResolvedProvider};
