//! monshin のコマンド（Command Pattern）とコンソールで受け付ける入力

use std::path::PathBuf;

use common::domain::{ModelName, ProviderName};

use crate::domain::patient::PatientProfile;
use crate::domain::summary_format::SummaryFormat;

/// monshin の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum MonshinCommand {
    /// ヘルプ表示
    Help,
    /// プロファイル一覧表示
    ListProfiles,
    /// 問診の実行
    Interview(InterviewRequest),
}

/// 問診 1 回の実行条件（CLI 指定分。未指定は interview.json と既定値で埋める）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewRequest {
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    pub patient: PatientProfile,
    pub format: Option<SummaryFormat>,
    pub max_turns: Option<usize>,
    pub max_retries: Option<usize>,
    pub no_summary: bool,
    pub summary_out: Option<PathBuf>,
    pub diagnosis_out: Option<PathBuf>,
}

/// 1 行の入力の解釈
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// 患者の発話
    Utterance(String),
    /// 問診を終了する（End Interview）
    End,
    /// セッションを破棄してやり直す
    Restart,
    /// プロセスを終える
    Quit,
    /// 空行
    Empty,
}

impl ConsoleInput {
    pub fn parse(line: &str) -> Self {
        let t = line.trim();
        match t {
            "" => Self::Empty,
            "/end" => Self::End,
            "/restart" => Self::Restart,
            "/quit" | "/exit" => Self::Quit,
            _ => Self::Utterance(t.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ConsoleInput::parse("/end\n"), ConsoleInput::End);
        assert_eq!(ConsoleInput::parse(" /restart "), ConsoleInput::Restart);
        assert_eq!(ConsoleInput::parse("/exit"), ConsoleInput::Quit);
        assert_eq!(ConsoleInput::parse("   "), ConsoleInput::Empty);
        assert_eq!(
            ConsoleInput::parse(" 頭痛があります \n"),
            ConsoleInput::Utterance("頭痛があります".to_string())
        );
    }
}
