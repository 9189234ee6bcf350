//! 問診ドメイン

pub mod command;
pub mod outcome;
pub mod patient;
pub mod policy;
pub mod session;
pub mod summary_format;
pub mod template;
pub mod termination;
pub mod turn;
pub mod validation;

pub use command::{ConsoleInput, InterviewRequest, MonshinCommand};
pub use outcome::Outcome;
pub use patient::{Age, Gender, PatientProfile};
pub use policy::InterviewPolicy;
pub use session::{Session, TerminationReason};
pub use summary_format::SummaryFormat;
pub use template::{PromptRenderer, PromptVariables, TemplateName};
pub use termination::ClosingDetector;
pub use validation::OutputValidator;
