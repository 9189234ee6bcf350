//! 問診前の基本情報（年齢・性別）の聞き取り
//!
//! CLI で指定済みの項目は聞かない。空欄や入力終端は「不明」のまま進める。

use common::error::Error;

use crate::domain::{Age, Gender, PatientProfile};
use crate::ports::outbound::PatientConsole;

const AGE_PROMPT: &str = "患者の年齢を入力してください（0〜120、空欄で不明）: ";
const GENDER_PROMPT: &str = "性別を入力してください（男性／女性／その他、空欄で不明）: ";

pub fn collect_intake(
    console: &mut dyn PatientConsole,
    preset: &PatientProfile,
) -> Result<PatientProfile, Error> {
    let age = match preset.age {
        Some(age) => Some(age),
        None => ask(console, AGE_PROMPT, Age::parse)?,
    };
    let gender = match preset.gender {
        Some(gender) => Some(gender),
        None => ask(console, GENDER_PROMPT, Gender::parse)?,
    };
    Ok(PatientProfile::new(age, gender))
}

/// 正しく読めるまで聞き直す
fn ask<T>(
    console: &mut dyn PatientConsole,
    prompt: &str,
    parse: fn(&str) -> Result<T, Error>,
) -> Result<Option<T>, Error> {
    loop {
        let Some(line) = console.read_line(prompt)? else {
            return Ok(None);
        };
        if line.trim().is_empty() {
            return Ok(None);
        }
        match parse(&line) {
            Ok(v) => return Ok(Some(v)),
            Err(e) => console.notice(&e.to_string())?,
        }
    }
}
