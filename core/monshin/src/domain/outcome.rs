//! 問診コントローラの 1 ターン分の結果

use crate::domain::session::TerminationReason;

/// 返した文の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// 固定の最初の質問（バックエンド呼び出しなし）
    Opening,
    /// 検証を通った生成質問
    Question,
    /// 固定の終了メッセージ
    Closing(TerminationReason),
    /// 再試行を使い切ったときの固定メッセージ
    SystemError,
}

/// 患者に見せる文と終了フラグ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub text: String,
    pub terminated: bool,
    pub kind: OutcomeKind,
    /// バックエンドを呼んだ回数
    pub attempts: usize,
}

impl Outcome {
    pub fn opening(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            terminated: false,
            kind: OutcomeKind::Opening,
            attempts: 0,
        }
    }

    pub fn question(text: impl Into<String>, attempts: usize) -> Self {
        Self {
            text: text.into(),
            terminated: false,
            kind: OutcomeKind::Question,
            attempts,
        }
    }

    pub fn closing(text: impl Into<String>, reason: TerminationReason, attempts: usize) -> Self {
        Self {
            text: text.into(),
            terminated: true,
            kind: OutcomeKind::Closing(reason),
            attempts,
        }
    }

    pub fn system_error(text: impl Into<String>, attempts: usize) -> Self {
        Self {
            text: text.into(),
            terminated: false,
            kind: OutcomeKind::SystemError,
            attempts,
        }
    }
}
