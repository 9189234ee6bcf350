//! 問診アプリケーション（1 プロセス 1 セッション）
//!
//! 開始・発話・手動終了・後処理（診断とサマリー）・やり直しを束ね、
//! コントローラが返した文を Session に記録する。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{log_event, FileSystem, Log, LogLevel, LogRecord};

use crate::domain::{Outcome, PatientProfile, Session, TerminationReason};
use crate::usecase::diagnosis::DiagnosisUseCase;
use crate::usecase::interview::InterviewController;
use crate::usecase::summarize::Summarizer;

/// 既定のサマリー出力先
pub const DEFAULT_SUMMARY_FILE: &str = "conversation_summary.txt";

/// 終了後の後処理の指定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinishOptions {
    /// false ならサマリーを作らない（--no-summary）
    pub summary: bool,
    pub summary_out: Option<PathBuf>,
    pub diagnosis_out: Option<PathBuf>,
}

/// 後処理の結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinishReport {
    pub diagnosis: String,
    pub summary: Option<String>,
    pub summary_path: Option<PathBuf>,
    pub diagnosis_path: Option<PathBuf>,
}

pub struct InterviewApp {
    controller: InterviewController,
    diagnosis: DiagnosisUseCase,
    summarizer: Summarizer,
    fs: Arc<dyn FileSystem>,
    log: Arc<dyn Log>,
    session: Session,
}

impl InterviewApp {
    pub fn new(
        controller: InterviewController,
        diagnosis: DiagnosisUseCase,
        summarizer: Summarizer,
        fs: Arc<dyn FileSystem>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            controller,
            diagnosis,
            summarizer,
            fs,
            log,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// 新しい Session を作り、最初の質問を記録して返す
    pub fn start(&mut self, patient: PatientProfile) -> Result<Outcome, Error> {
        self.session = Session::new(patient);
        let patient = self.session.patient();
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Info, "interview started")
                .layer("usecase")
                .kind("lifecycle")
                .field("age_known", patient.age.is_some())
                .field("gender_known", patient.gender.is_some())
                .field("max_turns", self.controller.policy().max_turns),
        );
        let outcome = self.controller.produce_next_question(&mut self.session, None)?;
        self.record(outcome)
    }

    /// 患者の発話を渡し、返ってきた文を記録して返す
    pub fn submit(&mut self, utterance: &str) -> Result<Outcome, Error> {
        let outcome = self
            .controller
            .produce_next_question(&mut self.session, Some(utterance))?;
        self.record(outcome)
    }

    /// 患者・操作者による手動終了。固定の終了メッセージを記録する。
    pub fn end(&mut self) -> Result<Outcome, Error> {
        if !self.session.terminate(TerminationReason::PatientEnded) {
            return Err(Error::invalid_state("interview already terminated"));
        }
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Info, "interview terminated")
                .layer("usecase")
                .kind("termination")
                .field("reason", TerminationReason::PatientEnded.as_str())
                .field("turn_count", self.session.turn_count()),
        );
        let outcome = Outcome::closing(
            self.controller.policy().closing_message.clone(),
            TerminationReason::PatientEnded,
            0,
        );
        self.record(outcome)
    }

    /// 終了済みの Session について診断とサマリーを作り、指定があればファイルに書き出す。
    /// 2 回目以降は Session に残った導出結果を使い、バックエンドを呼ばない。
    pub fn finish(&mut self, options: &FinishOptions) -> Result<FinishReport, Error> {
        if !self.session.is_terminated() {
            return Err(Error::invalid_state("interview is still in progress"));
        }
        if !self.session.has_patient_turn() {
            return Err(Error::invalid_argument(
                "No conversation available. Start an interview before requesting a summary.",
            ));
        }

        // 同じ Session で後処理をやり直しても、導出済みの診断とサマリーは再生成しない
        let diagnosis = match self.session.derived().diagnosis.clone() {
            Some(cached) => cached,
            None => self.diagnosis.run(&mut self.session)?,
        };
        let diagnosis_path = match &options.diagnosis_out {
            Some(path) => {
                self.write_note(path, &diagnosis)?;
                Some(path.clone())
            }
            None => None,
        };

        let mut report = FinishReport {
            diagnosis,
            diagnosis_path,
            ..FinishReport::default()
        };
        if options.summary {
            let summary = match self.session.derived().summary.clone() {
                Some(cached) => cached,
                None => self.summarizer.summarize_session(&mut self.session)?,
            };
            let path = options
                .summary_out
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SUMMARY_FILE));
            self.write_note(&path, &summary)?;
            report.summary = Some(summary);
            report.summary_path = Some(path);
        }
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Info, "interview finished")
                .layer("usecase")
                .kind("lifecycle")
                .field(
                    "reason",
                    self.session
                        .termination_reason()
                        .map(|r| r.as_str())
                        .unwrap_or("unknown"),
                )
                .field("turn_count", self.session.turn_count())
                .field("summary", report.summary.is_some()),
        );
        Ok(report)
    }

    /// Session と派生情報（診断・サマリー）を破棄して最初からやり直す
    pub fn restart(&mut self, patient: PatientProfile) -> Result<Outcome, Error> {
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Info, "interview restarted")
                .layer("usecase")
                .kind("lifecycle")
                .field("discarded_turns", self.session.turn_count()),
        );
        self.start(patient)
    }

    fn record(&mut self, outcome: Outcome) -> Result<Outcome, Error> {
        self.session.append_assistant(&outcome.text)?;
        Ok(outcome)
    }

    fn write_note(&self, path: &Path, contents: &str) -> Result<(), Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs.create_dir_all(parent)?;
        }
        let mut body = contents.to_string();
        if !body.ends_with('\n') {
            body.push('\n');
        }
        self.fs.write(path, &body)?;
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Info, "note written")
                .layer("usecase")
                .kind("output")
                .field("path", path.display().to_string()),
        );
        Ok(())
    }
}
