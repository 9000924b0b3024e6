use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use vimfiles_cli::cli::{Cli, RunConfig};
use vimfiles_cli::commands;
use vimfiles_cli::error::BootstrapError;
use vimfiles_cli::logging::{self, Logger};
use vimfiles_cli::probe;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();

    // Flags are parsed before logging so a bad invocation touches nothing.
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                BootstrapError::Usage(err.to_string()).exit_code()
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let debug = std::env::var_os("VIMFILES_DEBUG").is_some_and(|v| !v.is_empty());
    logging::init_subscriber(debug, "install");
    let log = Arc::new(Logger::new("install"));

    let (run, forced) = RunConfig::resolve(&args, probe::stdin_is_terminal());
    if forced {
        log.info("stdin is not a terminal; running non-interactively");
    }

    match commands::install::run(run, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log.error(&err.to_string());
            err.exit_code()
        }
    }
}
