//! 問診コントローラ
//!
//! 1 ターン分の流れ: 患者発話の追記 → 上限チェック → プロンプト描画 →
//! 生成 → 終了フレーズ判定 → 検証 → 採用または再試行。
//! 内容の不正は再試行で吸収し、バックエンド障害はそのまま呼び出し元へ返す。

use std::sync::Arc;

use common::error::Error;
use common::ports::outbound::{log_event, Log, LogLevel, LogRecord};

use crate::domain::{
    ClosingDetector, InterviewPolicy, Outcome, OutputValidator, PromptRenderer, PromptVariables,
    Session, TemplateName, TerminationReason,
};
use crate::ports::outbound::{CompletionClient, RetryDelay};

pub struct InterviewController {
    client: Arc<dyn CompletionClient>,
    validator: OutputValidator,
    closing: ClosingDetector,
    renderer: Arc<PromptRenderer>,
    policy: InterviewPolicy,
    delay: Arc<dyn RetryDelay>,
    log: Arc<dyn Log>,
}

impl InterviewController {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        validator: OutputValidator,
        closing: ClosingDetector,
        renderer: Arc<PromptRenderer>,
        policy: InterviewPolicy,
        delay: Arc<dyn RetryDelay>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            client,
            validator,
            closing,
            renderer,
            policy,
            delay,
            log,
        }
    }

    pub fn policy(&self) -> &InterviewPolicy {
        &self.policy
    }

    /// 次の質問（または固定の終了・エラーメッセージ）を返す。
    ///
    /// `utterance` が空でなければ患者の Turn として先に追記する。
    /// 空の Session に発話なしで呼ぶと、バックエンドを呼ばずに最初の質問を返す。
    /// 返した文を Turn として追記するのは呼び出し側の責務。
    pub fn produce_next_question(
        &self,
        session: &mut Session,
        utterance: Option<&str>,
    ) -> Result<Outcome, Error> {
        if session.is_terminated() {
            return Err(Error::invalid_state(
                "produce_next_question called on a terminated session",
            ));
        }

        match utterance.map(str::trim).filter(|u| !u.is_empty()) {
            Some(text) => {
                session.append_patient(text)?;
            }
            None if session.turn_count() == 0 => {
                return Ok(Outcome::opening(self.policy.opening_question.clone()));
            }
            None => {}
        }

        if session.turn_count() >= self.policy.max_turns {
            session.terminate(TerminationReason::TurnCeiling);
            self.log_termination(TerminationReason::TurnCeiling, session.turn_count(), 0);
            return Ok(Outcome::closing(
                self.policy.closing_message.clone(),
                TerminationReason::TurnCeiling,
                0,
            ));
        }

        let prompt = self
            .renderer
            .render(TemplateName::Interview, &PromptVariables::from_session(session))?;

        for attempt in 1..=self.policy.max_retries {
            if attempt > 1 {
                self.delay.wait(attempt);
            }
            let raw = self.client.complete(&prompt)?;
            let candidate = raw.trim();

            if let Some(phrase) = self.closing.find(candidate) {
                session.terminate(TerminationReason::ClosingPhrase);
                log_event(
                    self.log.as_ref(),
                    LogRecord::new(LogLevel::Info, "interview terminated")
                        .layer("usecase")
                        .kind("termination")
                        .field("reason", TerminationReason::ClosingPhrase.as_str())
                        .field("phrase", phrase)
                        .field("turn_count", session.turn_count())
                        .field("attempt", attempt),
                );
                return Ok(Outcome::closing(
                    self.policy.closing_message.clone(),
                    TerminationReason::ClosingPhrase,
                    attempt,
                ));
            }

            if candidate.is_empty() {
                self.log_rejection(attempt, "empty completion", &[]);
                continue;
            }

            let verdict = self.validator.validate(candidate);
            if verdict.is_valid() {
                return Ok(Outcome::question(candidate, attempt));
            }
            self.log_rejection(attempt, "output validation failed", verdict.invalid_segments());
        }

        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Error, "retries exhausted without a valid question")
                .layer("usecase")
                .kind("interview")
                .field("max_retries", self.policy.max_retries)
                .field("turn_count", session.turn_count()),
        );
        Ok(Outcome::system_error(
            self.policy.system_error_message.clone(),
            self.policy.max_retries,
        ))
    }

    fn log_rejection(&self, attempt: usize, message: &str, segments: &[String]) {
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Warn, message)
                .layer("usecase")
                .kind("validation")
                .field("attempt", attempt)
                .field("max_retries", self.policy.max_retries)
                .field("invalid_segments", segments.to_vec()),
        );
    }

    fn log_termination(&self, reason: TerminationReason, turn_count: usize, attempts: usize) {
        log_event(
            self.log.as_ref(),
            LogRecord::new(LogLevel::Info, "interview terminated")
                .layer("usecase")
                .kind("termination")
                .field("reason", reason.as_str())
                .field("turn_count", turn_count)
                .field("attempts", attempts),
        );
    }
}
