//! プロンプトテンプレートと描画
//!
//! プレースホルダは `{name}`（name は英小文字とアンダースコア）。
//! `age` / `gender` が未設定なら不明マーカーに置き換え、それ以外の未設定は MissingVariable。

use crate::domain::patient::PatientProfile;
use crate::domain::session::Session;
use crate::domain::summary_format::SummaryFormat;
use common::error::Error;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

pub const VAR_CONVERSATION_HISTORY: &str = "conversation_history";
pub const VAR_AGE: &str = "age";
pub const VAR_GENDER: &str = "gender";

/// 未設定でも失敗せず不明マーカーに落とす変数
const LENIENT_VARIABLES: &[&str] = &[VAR_AGE, VAR_GENDER];

pub const INTERVIEW_TEMPLATE: &str = "\
あなたは医師の診察前に患者へ問診を行う AI 医療アシスタントです。
以下のルールに従ってください。
1. 患者の主訴を明確にし、症状について詳しく聞き取ってください。
2. 情報が明確かつ十分になるよう、質問は一度に 1 つだけ行ってください。
3. この段階では診断名や考えられる病気を伝えないでください。
4. 回答は日本語のみで書いてください。英単語やローマ字は使わないでください（CT や MRI などの略語を除く）。
5. 十分な情報が集まったら「医師にお伝えします」と述べて問診を終えてください。

患者情報:
年齢: {age}
性別: {gender}

これまでの会話:
{conversation_history}

次の質問:
";

pub const DIAGNOSIS_TEMPLATE: &str = "\
あなたは患者への問診内容を分析する臨床支援アシスタントです。
1. 収集された患者情報を分析し、考えられる診断を挙げてください。
2. 症状と経過に合う一般的な疾患とまれな疾患の両方を検討してください。
3. 最も可能性の高い診断を確定または除外するために追加で聞くべき質問を挙げてください。

患者情報:
年齢: {age}
性別: {gender}

問診記録:
{conversation_history}

考えられる診断と追加で確認すべき質問:
";

pub const SOAP_SUMMARY_TEMPLATE: &str = "\
あなたは患者への問診を SOAP 形式の記録にまとめる医療アシスタントです。
以下の患者と AI アシスタントの会話から、構造化された SOAP ノートを作成してください。

書式:
S: 主観的情報 - 患者の症状と訴え
O: 客観的情報 - 観察できる事実や測定値（無ければ空欄）
A: 評価 - 会話の文脈から考えられる診断
P: 計画 - 推奨される次の対応や追加で集めるべき情報（実際の医療行為は含めない）

患者情報:
年齢: {age}
性別: {gender}

会話:
{conversation_history}

SOAP サマリー:
";

pub const HPI_SUMMARY_TEMPLATE: &str = "\
あなたは患者への問診を現病歴（HPI）としてまとめる医療アシスタントです。
以下の患者と AI アシスタントの会話から、発症時期・部位・性状・程度・経過・随伴症状・
増悪寛解因子を含む叙述的な現病歴を日本語で作成してください。

患者情報:
年齢: {age}
性別: {gender}

会話:
{conversation_history}

現病歴:
";

/// テンプレート名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateName {
    Interview,
    Diagnosis,
    Summary,
}

impl TemplateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interview => "interview",
            Self::Diagnosis => "diagnosis",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 3 種のテンプレート本文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub interview: String,
    pub diagnosis: String,
    pub summary: String,
}

impl PromptTemplates {
    pub fn builtin(format: SummaryFormat) -> Self {
        let summary = match format {
            SummaryFormat::Soap => SOAP_SUMMARY_TEMPLATE,
            SummaryFormat::Hpi => HPI_SUMMARY_TEMPLATE,
        };
        Self {
            interview: INTERVIEW_TEMPLATE.to_string(),
            diagnosis: DIAGNOSIS_TEMPLATE.to_string(),
            summary: summary.to_string(),
        }
    }

    pub fn get(&self, name: TemplateName) -> &str {
        match name {
            TemplateName::Interview => &self.interview,
            TemplateName::Diagnosis => &self.diagnosis,
            TemplateName::Summary => &self.summary,
        }
    }

    pub fn set(&mut self, name: TemplateName, body: String) {
        match name {
            TemplateName::Interview => self.interview = body,
            TemplateName::Diagnosis => self.diagnosis = body,
            TemplateName::Summary => self.summary = body,
        }
    }
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::builtin(SummaryFormat::default())
    }
}

/// テンプレートに埋め込む変数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptVariables(BTreeMap<String, String>);

impl PromptVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// トランスクリプトと、分かっていれば年齢・性別を束縛する
    pub fn from_session(session: &Session) -> Self {
        Self::for_patient(session.transcript(), session.patient())
    }

    pub fn for_patient(transcript: impl Into<String>, patient: &PatientProfile) -> Self {
        let mut vars = Self::new().with(VAR_CONVERSATION_HISTORY, transcript);
        if let Some(age) = patient.age {
            vars = vars.with(VAR_AGE, age.to_string());
        }
        if let Some(gender) = patient.gender {
            vars = vars.with(VAR_GENDER, gender.label());
        }
        vars
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// プロンプト描画器（副作用なし。同じ入力なら同じ文字列を返す）
#[derive(Debug, Clone)]
pub struct PromptRenderer {
    templates: PromptTemplates,
    unknown_marker: String,
    placeholder: Regex,
}

impl PromptRenderer {
    pub fn new(
        templates: PromptTemplates,
        unknown_marker: impl Into<String>,
    ) -> Result<Self, Error> {
        let placeholder = Regex::new(r"\{([a-z_]+)\}")
            .map_err(|e| Error::config(format!("placeholder pattern: {}", e)))?;
        Ok(Self {
            templates,
            unknown_marker: unknown_marker.into(),
            placeholder,
        })
    }

    pub fn render(&self, name: TemplateName, vars: &PromptVariables) -> Result<String, Error> {
        let template = self.templates.get(name);
        let mut out = String::with_capacity(template.len());
        let mut last = 0;
        for caps in self.placeholder.captures_iter(template) {
            let (whole, key) = match (caps.get(0), caps.get(1)) {
                (Some(w), Some(k)) => (w, k.as_str()),
                _ => continue,
            };
            out.push_str(&template[last..whole.start()]);
            out.push_str(self.resolve(name, key, vars)?);
            last = whole.end();
        }
        out.push_str(&template[last..]);
        Ok(out)
    }

    fn resolve<'a>(
        &'a self,
        name: TemplateName,
        key: &str,
        vars: &'a PromptVariables,
    ) -> Result<&'a str, Error> {
        if let Some(v) = vars.get(key) {
            return Ok(v);
        }
        if LENIENT_VARIABLES.contains(&key) {
            return Ok(&self.unknown_marker);
        }
        Err(Error::missing_variable(format!(
            "template '{}' requires variable '{}'",
            name, key
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patient::{Age, Gender};

    fn renderer() -> PromptRenderer {
        PromptRenderer::new(PromptTemplates::default(), "不明").unwrap()
    }

    #[test]
    fn test_render_embeds_history_and_patient() {
        let vars = PromptVariables::new()
            .with(VAR_CONVERSATION_HISTORY, "Patient: 頭痛があります")
            .with(VAR_AGE, "34歳")
            .with(VAR_GENDER, "女性");
        let prompt = renderer().render(TemplateName::Interview, &vars).unwrap();
        assert!(prompt.contains("Patient: 頭痛があります"));
        assert!(prompt.contains("年齢: 34歳"));
        assert!(prompt.contains("性別: 女性"));
        assert!(!prompt.contains("{conversation_history}"));
    }

    #[test]
    fn test_age_and_gender_degrade_to_unknown() {
        let vars = PromptVariables::new().with(VAR_CONVERSATION_HISTORY, "");
        let prompt = renderer().render(TemplateName::Diagnosis, &vars).unwrap();
        assert!(prompt.contains("年齢: 不明"));
        assert!(prompt.contains("性別: 不明"));
    }

    #[test]
    fn test_missing_required_variable_fails() {
        let err = renderer()
            .render(TemplateName::Summary, &PromptVariables::new())
            .unwrap_err();
        assert!(matches!(err, Error::MissingVariable(_)));
    }

    #[test]
    fn test_unknown_placeholder_in_override_fails() {
        let mut templates = PromptTemplates::default();
        templates.set(TemplateName::Interview, "{clinic_name}: {conversation_history}".to_string());
        let r = PromptRenderer::new(templates, "不明").unwrap();
        let vars = PromptVariables::new().with(VAR_CONVERSATION_HISTORY, "x");
        assert!(matches!(
            r.render(TemplateName::Interview, &vars),
            Err(Error::MissingVariable(_))
        ));
    }

    #[test]
    fn test_non_placeholder_braces_kept() {
        let mut templates = PromptTemplates::default();
        templates.set(
            TemplateName::Summary,
            "{\"json\": 1} {Upper} {conversation_history}".to_string(),
        );
        let r = PromptRenderer::new(templates, "不明").unwrap();
        let vars = PromptVariables::new().with(VAR_CONVERSATION_HISTORY, "履歴");
        assert_eq!(
            r.render(TemplateName::Summary, &vars).unwrap(),
            "{\"json\": 1} {Upper} 履歴"
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let vars = PromptVariables::new().with(VAR_CONVERSATION_HISTORY, "Patient: 咳が出ます");
        let r = renderer();
        let a = r.render(TemplateName::Interview, &vars).unwrap();
        let b = r.render(TemplateName::Interview, &vars).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_session_binds_known_fields_only() {
        let patient = PatientProfile::new(Some(Age::new(70).unwrap()), None);
        let mut session = Session::new(patient);
        session.append_patient("めまいがします").unwrap();
        let vars = PromptVariables::from_session(&session);
        assert_eq!(vars.get(VAR_CONVERSATION_HISTORY), Some("Patient: めまいがします"));
        assert_eq!(vars.get(VAR_AGE), Some("70歳"));
        assert_eq!(vars.get(VAR_GENDER), None);

        let session = Session::new(PatientProfile::new(None, Some(Gender::Male)));
        assert_eq!(PromptVariables::from_session(&session).get(VAR_GENDER), Some("男性"));
    }

    #[test]
    fn test_summary_template_follows_format() {
        assert!(PromptTemplates::builtin(SummaryFormat::Soap).summary.contains("SOAP"));
        assert!(PromptTemplates::builtin(SummaryFormat::Hpi).summary.contains("現病歴"));
    }
}
