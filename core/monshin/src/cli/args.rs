use std::io;
use std::path::PathBuf;

use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::domain::{ModelName, ProviderName};
use common::error::Error;

use crate::domain::{Age, Gender, InterviewRequest, MonshinCommand, PatientProfile, SummaryFormat};

const BIN_NAME: &str = "monshin";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub help: bool,
    /// -L / --list-profiles: 現在有効なプロファイル一覧を表示
    pub list_profiles: bool,
    /// -v / --verbose の回数: 1 で info まで、2 以上で debug まで stderr にも出す
    pub verbose: u8,
    /// --no-summary: 終了後にサマリーを作らない（診断は行う）
    pub no_summary: bool,
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub format: Option<SummaryFormat>,
    pub max_turns: Option<usize>,
    pub max_retries: Option<usize>,
    pub summary_out: Option<PathBuf>,
    pub diagnosis_out: Option<PathBuf>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new(BIN_NAME)
        .about("Conversational medical intake interview before the physician visit")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("list-profiles")
                .short('L')
                .long("list-profiles")
                .help("List currently available provider profiles")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Also write structured logs to stderr (-vv includes debug records)")
                .action(ArgAction::Count),
        )
        .arg(
            clap::Arg::new("no-summary")
                .long("no-summary")
                .help("Do not generate a summary after the interview ends")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("profile")
                .help("Specify LLM profile (ollama, openai, echo, etc.)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("model")
                .short('m')
                .long("model")
                .value_name("model")
                .help("Specify model name (e.g. llama3.1, qwen3:8b)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("age")
                .long("age")
                .value_name("years")
                .help("Patient age (0-120); asked interactively when omitted")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("gender")
                .long("gender")
                .value_name("gender")
                .help("Patient gender (男性|女性|その他, male|female|other)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("format")
                .long("format")
                .value_name("format")
                .help("Summary format (soap or hpi)")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-turns")
                .long("max-turns")
                .value_name("n")
                .help("Maximum number of turns before the interview is closed")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("max-retries")
                .long("max-retries")
                .value_name("n")
                .help("Maximum generation attempts per question")
                .value_parser(value_parser!(usize))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("summary-out")
                .long("summary-out")
                .value_name("path")
                .help("Write the summary to this file (default: conversation_summary.txt)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("diagnosis-out")
                .long("diagnosis-out")
                .value_name("path")
                .help("Write the silent diagnosis to this file (never shown to the patient)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("shell")
                .help("Generate shell completion script")
                .value_parser(value_parser!(Shell))
                .num_args(1),
        )
}

fn positive(name: &str, value: Option<usize>) -> Result<Option<usize>, Error> {
    match value {
        Some(0) => Err(Error::invalid_argument(format!("--{} must be at least 1", name))),
        other => Ok(other),
    }
}

fn matches_to_config(matches: &clap::ArgMatches) -> Result<Config, Error> {
    let profile = matches
        .get_one::<String>("profile")
        .map(|s| ProviderName::new(s.clone()));
    let model = matches
        .get_one::<String>("model")
        .map(|s| ModelName::new(s.clone()));
    let age = matches
        .get_one::<String>("age")
        .map(|s| Age::parse(s))
        .transpose()?;
    let gender = matches
        .get_one::<String>("gender")
        .map(|s| Gender::parse(s))
        .transpose()?;
    let format = matches
        .get_one::<String>("format")
        .map(|s| SummaryFormat::parse(s))
        .transpose()?;

    Ok(Config {
        help: matches.get_flag("help"),
        list_profiles: matches.get_flag("list-profiles"),
        verbose: matches.get_count("verbose"),
        no_summary: matches.get_flag("no-summary"),
        profile,
        model,
        age,
        gender,
        format,
        max_turns: positive("max-turns", matches.get_one::<usize>("max-turns").copied())?,
        max_retries: positive("max-retries", matches.get_one::<usize>("max-retries").copied())?,
        summary_out: matches.get_one::<PathBuf>("summary-out").cloned(),
        diagnosis_out: matches.get_one::<PathBuf>("diagnosis-out").cloned(),
    })
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
pub fn parse_args() -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches()
        .map_err(|e| Error::invalid_argument(e.to_string()))?;

    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }

    Ok(ParseOutcome::Config(matches_to_config(&matches)?))
}

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::invalid_argument(e.to_string()))?;
    matches_to_config(&matches)
}

/// 補完スクリプトを標準出力に出力する
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
}

/// Config を MonshinCommand に変換する
pub fn config_to_command(config: Config) -> MonshinCommand {
    if config.help {
        return MonshinCommand::Help;
    }

    if config.list_profiles {
        return MonshinCommand::ListProfiles;
    }

    MonshinCommand::Interview(InterviewRequest {
        profile: config.profile,
        model: config.model,
        patient: PatientProfile::new(config.age, config.gender),
        format: config.format,
        max_turns: config.max_turns,
        max_retries: config.max_retries,
        no_summary: config.no_summary,
        summary_out: config.summary_out,
        diagnosis_out: config.diagnosis_out,
    })
}

pub fn print_usage() {
    eprintln!("Usage: monshin [options]");
}

pub fn print_help() {
    println!("Usage: monshin [options]");
    println!("Options:");
    println!("  -h, --help                     Show this help message");
    println!("  -L, --list-profiles            List currently available provider profiles (profiles.json + built-ins)");
    println!("  -p, --profile <profile>        Specify LLM profile. Default: profiles.json default, or ollama if not set.");
    println!("  -m, --model <model>            Specify model name. Overrides interview.json model_identifier and the profile model.");
    println!("  --age <years>                  Patient age (0-120). Asked interactively when omitted.");
    println!("  --gender <gender>              Patient gender (男性|女性|その他). Asked interactively when omitted.");
    println!("  --format <soap|hpi>            Summary format (default: soap)");
    println!("  --max-turns <n>                Maximum number of turns (default: 30)");
    println!("  --max-retries <n>              Maximum generation attempts per question (default: 3)");
    println!("  --summary-out <path>           Summary output file (default: conversation_summary.txt)");
    println!("  --diagnosis-out <path>         Also write the silent diagnosis to this file");
    println!("  --no-summary                   Skip the summary after the interview ends");
    println!("  -v, --verbose                  Also write info-level structured logs to stderr");
    println!("  -vv                            Include debug records (e.g. the diagnosis) on stderr");
    println!("  --generate <shell>             Generate shell completion script (bash, zsh, fish, ...)");
    println!();
    println!("Commands during the interview:");
    println!("  /end        End the interview now");
    println!("  /restart    Discard the current interview and start over");
    println!("  /quit       Exit without further processing");
    println!();
    println!("Environment:");
    println!("  MONSHIN_HOME    Home directory for profiles.json, interview.json and logs/.");
    println!("                  If unset, $XDG_CONFIG_HOME/monshin (e.g. ~/.config/monshin) is used.");
    println!();
    println!("Examples:");
    println!("  monshin");
    println!("  monshin --age 42 --gender 女性 --format hpi");
    println!("  monshin -p echo --no-summary");
}
