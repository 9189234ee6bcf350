//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;
use std::time::Duration;

use common::adapter::{
    CompositeLog, FileJsonLog, NoopLog, StderrLog, StdEnvResolver, StdFileSystem,
};
use common::error::Error;
use common::llm::{create_provider, load_profiles_config, resolve_provider};
use common::ports::outbound::{log_event, EnvResolver, FileSystem, Log, LogLevel, LogRecord};

use crate::adapter::{
    load_interview_config, load_templates, FixedDelay, InterviewConfig, LlmDriverCompletion,
    NoDelay, StdProfileLister, TimeoutCompletion,
};
use crate::domain::{ClosingDetector, InterviewRequest, OutputValidator, PromptRenderer};
use crate::ports::outbound::{ProfileLister, RetryDelay};
use crate::usecase::{
    DiagnosisUseCase, FinishOptions, InterviewApp, InterviewController, Summarizer,
};

/// 配線済みの共通依存
pub struct App {
    pub fs: Arc<dyn FileSystem>,
    pub env_resolver: Arc<dyn EnvResolver>,
    pub logger: Arc<dyn Log>,
    pub profile_lister: Arc<dyn ProfileLister>,
}

/// 標準アダプタで App を組み立てる。-v のときは stderr にもログを出す。
pub fn wire_app(verbose: u8) -> App {
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let env_resolver: Arc<dyn EnvResolver> = Arc::new(StdEnvResolver);
    let logger = wire_logger(&fs, env_resolver.as_ref(), verbose);
    let profile_lister: Arc<dyn ProfileLister> = Arc::new(StdProfileLister::new(
        Arc::clone(&fs),
        Arc::clone(&env_resolver),
    ));
    App {
        fs,
        env_resolver,
        logger,
        profile_lister,
    }
}

/// -v の回数から stderr に出す上限レベルを決める
pub(crate) fn stderr_level(verbose: u8) -> Option<LogLevel> {
    match verbose {
        0 => None,
        1 => Some(LogLevel::Info),
        _ => Some(LogLevel::Debug),
    }
}

/// ホームが解決できなければファイルには書かない
fn wire_logger(fs: &Arc<dyn FileSystem>, env: &dyn EnvResolver, verbose: u8) -> Arc<dyn Log> {
    let mut logs: Vec<Arc<dyn Log>> = Vec::new();
    if let Ok(home) = env.resolve_home_dir() {
        logs.push(Arc::new(FileJsonLog::new(Arc::clone(fs), home.log_path())));
    }
    if let Some(level) = stderr_level(verbose) {
        logs.push(Arc::new(StderrLog::new(level)));
    }
    match logs.len() {
        0 => Arc::new(NoopLog),
        1 => logs.remove(0),
        _ => Arc::new(CompositeLog::new(logs)),
    }
}

/// interview.json に CLI の指定を重ねる（CLI > interview.json > 既定値）
pub fn apply_request(cfg: &mut InterviewConfig, req: &InterviewRequest) -> Result<(), Error> {
    if let Some(format) = req.format {
        cfg.summary_format = format;
    }
    if let Some(n) = req.max_turns {
        cfg.policy.max_turns = n;
    }
    if let Some(n) = req.max_retries {
        cfg.policy.max_retries = n;
    }
    cfg.validate()
}

/// 問診アプリと後処理の指定を組み立てる
pub fn wire_interview(
    app: &App,
    req: &InterviewRequest,
) -> Result<(InterviewApp, FinishOptions), Error> {
    let home = app.env_resolver.resolve_home_dir()?;
    let mut cfg = load_interview_config(app.fs.as_ref(), &home.interview_config_path())?;
    apply_request(&mut cfg, req)?;

    let profiles = load_profiles_config(app.fs.as_ref(), &home.profiles_config_path())?;
    let resolved = resolve_provider(req.profile.as_ref(), profiles.as_ref())?;
    // -m > interview.json の model_identifier > プロファイルのモデル > プロバイダ既定
    let model = req
        .model
        .as_ref()
        .map(|m| m.to_string())
        .or_else(|| cfg.model_identifier.clone())
        .or_else(|| resolved.model.clone());
    let provider = create_provider(
        resolved.provider_type,
        model.clone(),
        resolved.base_url.clone(),
        resolved.api_key_env.clone(),
        resolved.temperature,
        resolved.timeout_secs.map(Duration::from_secs),
    )?;
    let completion = LlmDriverCompletion::new(provider);
    let provider_name = completion.provider_name().to_string();
    let client = TimeoutCompletion::wrap(Arc::new(completion), cfg.completion_timeout);

    let templates = load_templates(app.fs.as_ref(), &cfg, &home)?;
    let renderer = Arc::new(PromptRenderer::new(templates, cfg.unknown_marker.clone())?);
    let validator = OutputValidator::new(cfg.validator.clone())?;
    let closing = ClosingDetector::new(cfg.closing_phrases.clone(), cfg.closing_phrase_match);
    let delay: Arc<dyn RetryDelay> = if cfg.retry_delay.is_zero() {
        Arc::new(NoDelay)
    } else {
        Arc::new(FixedDelay(cfg.retry_delay))
    };

    log_event(
        app.logger.as_ref(),
        LogRecord::new(LogLevel::Info, "interview wired")
            .layer("wiring")
            .kind("lifecycle")
            .field("profile", resolved.profile_name.as_str())
            .field("provider", provider_name)
            .field("model", model.unwrap_or_else(|| "(default)".to_string()))
            .field("summary_format", cfg.summary_format.as_str())
            .field("closing_phrases", closing.phrase_count())
            .field("closing_phrase_match", closing.mode().as_str())
            .field("max_turns", cfg.policy.max_turns)
            .field("max_retries", cfg.policy.max_retries),
    );

    let controller = InterviewController::new(
        Arc::clone(&client),
        validator,
        closing,
        Arc::clone(&renderer),
        cfg.policy.clone(),
        delay,
        Arc::clone(&app.logger),
    );
    let diagnosis = DiagnosisUseCase::new(
        Arc::clone(&client),
        Arc::clone(&renderer),
        Arc::clone(&app.logger),
    );
    let summarizer = Summarizer::new(client, renderer, Arc::clone(&app.logger));
    let interview = InterviewApp::new(
        controller,
        diagnosis,
        summarizer,
        Arc::clone(&app.fs),
        Arc::clone(&app.logger),
    );
    let finish = FinishOptions {
        summary: !req.no_summary,
        summary_out: req.summary_out.clone(),
        diagnosis_out: req.diagnosis_out.clone(),
    };
    Ok((interview, finish))
}
