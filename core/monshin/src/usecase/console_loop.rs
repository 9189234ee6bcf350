//! コンソールでの問診ループ
//!
//! 患者の入力を読み、アシスタントの文を表示する。終了後は診断とサマリーを作り、
//! `/restart` で新しい問診を始めるか、`/quit` または入力終端で抜ける。

use common::error::Error;

use crate::domain::{ConsoleInput, PatientProfile};
use crate::ports::outbound::PatientConsole;
use crate::usecase::app::{FinishOptions, InterviewApp};
use crate::usecase::intake::collect_intake;

const INPUT_PROMPT: &str = "患者: ";
const AFTER_PROMPT: &str = "> ";
const HELP_NOTICE: &str = "/end で問診を終了、/restart でやり直し、/quit で終了します";
const AFTER_NOTICE: &str = "/restart で新しい問診を開始、/quit で終了します";

pub struct ConsoleLoop<'a> {
    app: &'a mut InterviewApp,
    console: &'a mut dyn PatientConsole,
    preset: PatientProfile,
    finish: FinishOptions,
}

impl<'a> ConsoleLoop<'a> {
    pub fn new(
        app: &'a mut InterviewApp,
        console: &'a mut dyn PatientConsole,
        preset: PatientProfile,
        finish: FinishOptions,
    ) -> Self {
        Self {
            app,
            console,
            preset,
            finish,
        }
    }

    /// 終了コードを返す
    pub fn run(&mut self) -> Result<i32, Error> {
        self.console.notice(HELP_NOTICE)?;
        self.begin()?;
        loop {
            if self.app.session().is_terminated() {
                self.finish_session()?;
                if !self.wait_for_restart()? {
                    return Ok(0);
                }
                continue;
            }
            let Some(line) = self.console.read_line(INPUT_PROMPT)? else {
                return Ok(0);
            };
            match ConsoleInput::parse(&line) {
                ConsoleInput::Empty => {}
                ConsoleInput::Quit => return Ok(0),
                ConsoleInput::End => {
                    let outcome = self.app.end()?;
                    self.console.say(&outcome.text)?;
                }
                ConsoleInput::Restart => self.begin()?,
                ConsoleInput::Utterance(text) => {
                    let outcome = self.app.submit(&text)?;
                    self.console.say(&outcome.text)?;
                }
            }
        }
    }

    fn begin(&mut self) -> Result<(), Error> {
        let patient = collect_intake(self.console, &self.preset)?;
        let outcome = if self.app.session().turn_count() == 0 {
            self.app.start(patient)?
        } else {
            self.app.restart(patient)?
        };
        self.console.say(&outcome.text)
    }

    fn finish_session(&mut self) -> Result<(), Error> {
        if !self.app.session().has_patient_turn() {
            return self
                .console
                .notice("会話がないため、サマリーは作成しません");
        }
        let report = self.app.finish(&self.finish)?;
        if let Some(path) = &report.summary_path {
            self.console
                .notice(&format!("サマリーを {} に保存しました", path.display()))?;
        }
        Ok(())
    }

    /// `/restart` なら true、`/quit` か入力終端なら false
    fn wait_for_restart(&mut self) -> Result<bool, Error> {
        self.console.notice(AFTER_NOTICE)?;
        loop {
            let Some(line) = self.console.read_line(AFTER_PROMPT)? else {
                return Ok(false);
            };
            match ConsoleInput::parse(&line) {
                ConsoleInput::Restart => {
                    self.begin()?;
                    return Ok(true);
                }
                ConsoleInput::Quit => return Ok(false),
                ConsoleInput::Empty => {}
                ConsoleInput::End | ConsoleInput::Utterance(_) => {
                    self.console.notice("問診は終了しています")?;
                }
            }
        }
    }
}
