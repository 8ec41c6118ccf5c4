//! fieldmap CLI entry point.

use clap::{ColorChoice, Parser};
use std::io::IsTerminal;

mod cli;
mod commands;
mod config;
mod logging;
mod summary;

use fieldmap_model::IntakeError;

use crate::cli::{Cli, Command, LogFormatArg, ReportFormatArg};
use crate::commands::{run_intake, run_mapping, run_schema};
use crate::logging::{LogConfig, LogFormat, init_logging};
use crate::summary::{print_mapping, print_report, print_schema};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    init_logging(&log_config_from_cli(&cli));

    let exit_code = match cli.command {
        Command::Intake(args) => match run_intake(&args) {
            Ok(report) => {
                match args.format {
                    ReportFormatArg::Json => match serde_json::to_string_pretty(&report) {
                        Ok(json) => println!("{json}"),
                        Err(error) => eprintln!("error: failed to render report: {error}"),
                    },
                    ReportFormatArg::Table => print_report(&report),
                }
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Mapping(args) => match run_mapping(&args) {
            Ok(run) => {
                print_mapping(&run);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Schema(args) => {
            print_schema(&run_schema(&args));
            0
        }
    };
    std::process::exit(exit_code);
}

/// Maps failures to stable exit codes: 2 for client-input problems, 3 for
/// access-denied, 1 for everything else.
fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    match error.downcast_ref::<IntakeError>() {
        Some(intake) if intake.is_access_denied() => 3,
        Some(intake) if intake.is_client_error() => 2,
        _ => 1,
    }
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        },
        with_ansi: match cli.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::stderr().is_terminal(),
        },
    }
}
