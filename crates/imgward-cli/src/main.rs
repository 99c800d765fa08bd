//! imgward CLI - Command-line image security scanner producing Markdown
//! reports.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose, cli.quiet);
    let formatter = output::create_formatter(cli.command.name(), cli.json, cli.verbose, cli.quiet);

    let result = match &cli.command {
        cli::Commands::Scan(args) => {
            commands::scan::execute(args, &*formatter, !(cli.quiet || cli.json))
        }
        cli::Commands::Check(args) => commands::check::execute(args, &*formatter),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            formatter.format_error(&err);
            ExitCode::FAILURE
        }
    }
}
