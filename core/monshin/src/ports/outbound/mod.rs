//! Outbound ポート: アプリが外界（生成バックエンド・待機・コンソール等）を使うための trait

pub mod completion_client;
pub mod patient_console;
pub mod profile_lister;
pub mod retry_delay;

pub use completion_client::CompletionClient;
pub use patient_console::PatientConsole;
pub use profile_lister::ProfileLister;
pub use retry_delay::RetryDelay;
