//! 問診 1 回分の状態（Session）
//!
//! Turn は追記のみで、挿入順がそのままトランスクリプトの再生順になる。
//! 終了フラグは false → true の一方向で、戻すには新しい Session を作る。

use crate::domain::patient::PatientProfile;
use crate::domain::turn::{Speaker, Turn};
use common::error::Error;

/// 終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Turn 数が上限に達した
    TurnCeiling,
    /// 生成文に終了フレーズが含まれていた
    ClosingPhrase,
    /// 患者（または操作者）が明示的に終了した
    PatientEnded,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TurnCeiling => "turn_ceiling",
            Self::ClosingPhrase => "closing_phrase",
            Self::PatientEnded => "patient_ended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    Terminated {
        reason: TerminationReason,
        closing_recorded: bool,
    },
}

/// 問診後に導出されるテキスト。患者には見せない。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedNotes {
    pub diagnosis: Option<String>,
    pub summary: Option<String>,
}

/// 問診 1 回分の状態
#[derive(Debug, Clone)]
pub struct Session {
    turns: Vec<Turn>,
    patient: PatientProfile,
    state: SessionState,
    derived: DerivedNotes,
}

impl Session {
    pub fn new(patient: PatientProfile) -> Self {
        Self {
            turns: Vec::new(),
            patient,
            state: SessionState::Active,
            derived: DerivedNotes::default(),
        }
    }

    pub fn patient(&self) -> &PatientProfile {
        &self.patient
    }

    #[cfg(test)]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, SessionState::Terminated { .. })
    }

    pub fn termination_reason(&self) -> Option<TerminationReason> {
        match self.state {
            SessionState::Active => None,
            SessionState::Terminated { reason, .. } => Some(reason),
        }
    }

    /// 患者の発話を追記する。終了後は InvalidState。
    pub fn append_patient(&mut self, text: &str) -> Result<&Turn, Error> {
        if self.is_terminated() {
            return Err(Error::invalid_state(
                "cannot append a patient turn to a terminated session",
            ));
        }
        Ok(self.push(Speaker::Patient, text))
    }

    /// アシスタントの発話を追記する。
    ///
    /// 終了後は終了メッセージ 1 件だけを受け付ける。
    pub fn append_assistant(&mut self, text: &str) -> Result<&Turn, Error> {
        match self.state {
            SessionState::Active => {}
            SessionState::Terminated {
                reason,
                closing_recorded: false,
            } => {
                self.state = SessionState::Terminated {
                    reason,
                    closing_recorded: true,
                };
            }
            SessionState::Terminated {
                closing_recorded: true,
                ..
            } => {
                return Err(Error::invalid_state(
                    "closing message already recorded for this session",
                ));
            }
        }
        Ok(self.push(Speaker::Assistant, text))
    }

    /// 終了させる。既に終了していれば最初の理由を保持して false を返す。
    pub fn terminate(&mut self, reason: TerminationReason) -> bool {
        if self.is_terminated() {
            return false;
        }
        self.state = SessionState::Terminated {
            reason,
            closing_recorded: false,
        };
        true
    }

    /// 患者の発話が 1 件以上あるか
    pub fn has_patient_turn(&self) -> bool {
        self.turns.iter().any(|t| t.speaker() == Speaker::Patient)
    }

    /// 挿入順に "Patient: ..." / "Assistant: ..." を改行で連結したもの
    pub fn transcript(&self) -> String {
        self.turns
            .iter()
            .map(Turn::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn derived(&self) -> &DerivedNotes {
        &self.derived
    }

    pub fn set_diagnosis(&mut self, diagnosis: String) {
        self.derived.diagnosis = Some(diagnosis);
    }

    pub fn set_summary(&mut self, summary: String) {
        self.derived.summary = Some(summary);
    }

    fn push(&mut self, speaker: Speaker, text: &str) -> &Turn {
        let index = self.turns.len();
        self.turns.push(Turn::new(speaker, text, index));
        &self.turns[index]
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PatientProfile::default())
    }
}
