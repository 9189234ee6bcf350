//! テスト共通の部品（記録用 Log / RetryDelay、固定ホーム、コントローラの組み立て）

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use common::domain::HomeDir;
use common::error::Error;
use common::ports::outbound::{EnvResolver, Log, LogLevel, LogRecord};

use crate::adapter::{ScriptedCompletion, TimeoutCompletion};
use crate::domain::validation::DEFAULT_ALLOWED_FOREIGN_TOKENS;
use crate::domain::template::PromptTemplates;
use crate::domain::termination::ClosingPhraseMatch;
use crate::domain::validation::ValidatorPolicy;
use crate::domain::{ClosingDetector, InterviewPolicy, OutputValidator, PromptRenderer};
use crate::ports::outbound::{CompletionClient, RetryDelay};
use crate::usecase::InterviewController;

/// 受け取ったレコードを保持する Log
#[derive(Default)]
pub struct MemoryLog {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLog {
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn count(&self, level: LogLevel, kind: &str) -> usize {
        self.records()
            .iter()
            .filter(|r| r.level == level && r.kind.as_deref() == Some(kind))
            .count()
    }
}

impl Log for MemoryLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// wait に渡された試行番号を記録する RetryDelay
#[derive(Default)]
pub struct RecordingDelay {
    attempts: Mutex<Vec<usize>>,
}

impl RecordingDelay {
    pub fn attempts(&self) -> Vec<usize> {
        self.attempts.lock().unwrap().clone()
    }
}

impl RetryDelay for RecordingDelay {
    fn wait(&self, attempt: usize) {
        self.attempts.lock().unwrap().push(attempt);
    }
}

/// 固定ディレクトリをホームとして返す EnvResolver
pub struct FixedHome(pub PathBuf);

impl EnvResolver for FixedHome {
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        Ok(HomeDir::new(self.0.clone()))
    }

    fn var(&self, _name: &str) -> Option<String> {
        None
    }
}

/// コントローラと観測用の部品一式
pub struct Harness {
    pub controller: InterviewController,
    pub client: Arc<ScriptedCompletion>,
    pub log: Arc<MemoryLog>,
    pub delay: Arc<RecordingDelay>,
}

pub struct HarnessOptions {
    pub policy: InterviewPolicy,
    pub allowed: Vec<String>,
    pub closing_match: ClosingPhraseMatch,
    pub timeout: Option<Duration>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            policy: InterviewPolicy::default(),
            allowed: DEFAULT_ALLOWED_FOREIGN_TOKENS.iter().map(|s| s.to_string()).collect(),
            closing_match: ClosingPhraseMatch::Substring,
            timeout: None,
        }
    }
}

pub fn renderer() -> Arc<PromptRenderer> {
    Arc::new(PromptRenderer::new(PromptTemplates::default(), "不明").unwrap())
}

pub fn harness_with(client: ScriptedCompletion, opts: HarnessOptions) -> Harness {
    let client = Arc::new(client);
    let log = Arc::new(MemoryLog::default());
    let delay = Arc::new(RecordingDelay::default());
    let client_port: Arc<dyn CompletionClient> = client.clone();
    let delay_port: Arc<dyn RetryDelay> = delay.clone();
    let log_port: Arc<dyn Log> = log.clone();
    let controller = InterviewController::new(
        TimeoutCompletion::wrap(client_port, opts.timeout),
        OutputValidator::new(ValidatorPolicy::japanese(opts.allowed)).unwrap(),
        ClosingDetector::new(
            crate::domain::termination::DEFAULT_CLOSING_PHRASES.iter().copied(),
            opts.closing_match,
        ),
        renderer(),
        opts.policy,
        delay_port,
        log_port,
    );
    Harness {
        controller,
        client,
        log,
        delay,
    }
}

pub fn harness(replies: &[&str]) -> Harness {
    harness_with(ScriptedCompletion::texts(replies), HarnessOptions::default())
}
