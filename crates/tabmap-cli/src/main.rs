//! tabmap command-line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tabmap_cli::logging::{LogConfig, LogFormat, init_logging};
use tabmap_cli::settings::load_settings;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{CacheCommand, Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_cache_clear, run_cache_show, run_export, run_headers, run_values};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let settings = load_settings(cli.settings.as_deref());
    let cache_dir = cli.cache_dir.as_deref();
    let result = match &cli.command {
        Command::Headers(args) => run_headers(args),
        Command::Values(args) => run_values(args),
        Command::Export(args) => run_export(args, &settings, cache_dir),
        Command::Cache { action } => match action {
            CacheCommand::Show => run_cache_show(&settings, cache_dir),
            CacheCommand::Clear => run_cache_clear(&settings, cache_dir),
        },
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
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
    config.log_data = cli.log_data;
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
