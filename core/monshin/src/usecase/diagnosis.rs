//! 無言の診断（患者には見せない）
//!
//! トランスクリプトから考えられる診断と追加質問を 1 回の生成で導出する。

use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{log_event, Log, LogLevel, LogRecord};

use crate::domain::{PromptRenderer, PromptVariables, Session, TemplateName};
use crate::ports::outbound::CompletionClient;

pub struct DiagnosisUseCase {
    client: Arc<dyn CompletionClient>,
    renderer: Arc<PromptRenderer>,
    log: Arc<dyn Log>,
}

impl DiagnosisUseCase {
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

    /// 診断を導出して Session の派生情報に保存する
    pub fn run(&self, session: &mut Session) -> Result<String, Error> {
        let prompt = self
            .renderer
            .render(TemplateName::Diagnosis, &PromptVariables::from_session(session))?;
        let diagnosis = self.client.complete(&prompt)?
            .trim()
            .to_string();
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Debug, "silent diagnosis derived")
                .layer("usecase")
                .kind("diagnosis")
                .field("diagnosis", diagnosis.as_str())
                .field("turn_count", session.turn_count()),
        );
        session.set_diagnosis(diagnosis.clone());
        Ok(diagnosis)
    }
}
