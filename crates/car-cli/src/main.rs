//! ERW CaR viewer CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use car_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use car_cli::commands::{run_render, run_stones};
use car_cli::logging::{LogConfig, LogFormat, init_logging};
use car_cli::settings::Settings;
use car_cli::summary::{print_render_summary, print_stones};

/// Unusable results folder, settings or output path.
const EXIT_STARTUP: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_STARTUP);
    }
    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(EXIT_STARTUP);
        }
    };
    let exit_code = match &cli.command {
        Command::Render(args) => match run_render(args, &settings) {
            Ok(report) => {
                print_render_summary(&report);
                report.exit_code()
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                EXIT_STARTUP
            }
        },
        Command::Stones(args) => match run_stones(args) {
            Ok(listing) => {
                print_stones(&listing);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                EXIT_STARTUP
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
