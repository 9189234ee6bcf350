mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::io;
use std::process;

use common::error::Error;
use common::ports::outbound::{log_event, LogLevel, LogRecord};

use adapter::StdConsole;
use cli::{
    config_to_command, parse_args, print_completion, print_help, print_usage, Config, ParseOutcome,
};
use domain::MonshinCommand;
use ports::inbound::RunInterview;
use usecase::ConsoleLoop;
use wiring::{wire_app, wire_interview, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl RunInterview for Runner {
    fn run(&self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config);
        let command_name = cmd_name_for_log(&cmd);
        log_event(
            self.app.logger.as_ref(),
            LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = match cmd {
            MonshinCommand::Help => {
                print_help();
                Ok(0)
            }
            MonshinCommand::ListProfiles => {
                let (names, default) = self.app.profile_lister.list_profiles()?;
                for name in &names {
                    if *name == default {
                        println!("{} (default)", name);
                    } else {
                        println!("{}", name);
                    }
                }
                Ok(0)
            }
            MonshinCommand::Interview(req) => {
                let (mut interview, finish) = wire_interview(&self.app, &req)?;
                let stdin = io::stdin();
                let mut console = StdConsole::new(stdin.lock(), io::stdout());
                ConsoleLoop::new(&mut interview, &mut console, req.patient.clone(), finish).run()
            }
        };

        let code = result.as_ref().copied().unwrap_or_else(|e| e.exit_code());
        log_event(
            self.app.logger.as_ref(),
            LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            log_event(
                self.app.logger.as_ref(),
                LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("cli")
                    .kind("error"),
            );
        }
        result
    }
}

fn cmd_name_for_log(cmd: &MonshinCommand) -> &'static str {
    match cmd {
        MonshinCommand::Help => "help",
        MonshinCommand::ListProfiles => "list-profiles",
        MonshinCommand::Interview(_) => "interview",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("monshin: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let runner = Runner {
        app: wire_app(config.verbose),
    };
    runner.run(config)
}
