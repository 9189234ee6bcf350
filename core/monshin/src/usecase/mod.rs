//! ユースケース（問診・診断・サマリー・コンソールループ）

pub mod app;
pub mod console_loop;
pub mod diagnosis;
pub mod intake;
pub mod interview;
pub mod summarize;

pub use app::{FinishOptions, InterviewApp};
pub use console_loop::ConsoleLoop;
pub use diagnosis::DiagnosisUseCase;
pub use interview::InterviewController;
pub use summarize::Summarizer;
