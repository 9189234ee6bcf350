//! アダプター（生成バックエンド・設定ファイル・コンソール等の I/O を ports の trait で包む）

pub(crate) mod config;
pub(crate) mod console;
pub(crate) mod llm_completion;
pub(crate) mod profile_lister;
pub(crate) mod retry_delay;
pub(crate) mod stub_completion;
pub(crate) mod timeout_completion;

pub(crate) use config::{load_interview_config, load_templates, InterviewConfig};
pub(crate) use console::StdConsole;
pub(crate) use llm_completion::LlmDriverCompletion;
pub(crate) use profile_lister::StdProfileLister;
pub(crate) use retry_delay::{FixedDelay, NoDelay};
#[cfg(test)]
pub(crate) use stub_completion::ScriptedCompletion;
pub(crate) use timeout_completion::TimeoutCompletion;
