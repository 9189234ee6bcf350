//! サマリー作成（SOAP / HPI）
//!
//! 描画 1 回と生成 1 回だけ。検証も再試行もしない。

use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{log_event, Log, LogLevel, LogRecord};

use crate::domain::{PatientProfile, PromptRenderer, PromptVariables, Session, TemplateName};
use crate::ports::outbound::CompletionClient;

pub struct Summarizer {
    client: Arc<dyn CompletionClient>,
    renderer: Arc<PromptRenderer>,
    log: Arc<dyn Log>,
}

impl Summarizer {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        renderer: Arc<PromptRenderer>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            client,
            renderer,
            log,
        }
    }

    /// トランスクリプト文字列からサマリーを作る（年齢・性別は不明扱い）
    pub fn summarize(&self, transcript: &str) -> Result<String, Error> {
        self.summarize_with(transcript, &PatientProfile::default())
    }

    /// Session からサマリーを作って保存する。患者の発話が無ければ usage エラー。
    pub fn summarize_session(&self, session: &mut Session) -> Result<String, Error> {
        if !session.has_patient_turn() {
            return Err(Error::invalid_argument(
                "No conversation available. Start an interview before requesting a summary.",
            ));
        }
        let summary = self.summarize_with(&session.transcript(), session.patient())?;
        session.set_summary(summary.clone());
        Ok(summary)
    }

    fn summarize_with(&self, transcript: &str, patient: &PatientProfile) -> Result<String, Error> {
        let prompt = self.renderer.render(
            TemplateName::Summary,
            &PromptVariables::for_patient(transcript, patient),
        )?;
        let summary = self.client.complete(&prompt)?
            .trim()
            .to_string();
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Info, "summary generated")
                .layer("usecase")
                .kind("summary")
                .field("chars", summary.chars().count()),
        );
        Ok(summary)
    }
}
