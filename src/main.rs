// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use subedit::app_config::{Config, LogLevel};
use subedit::language_utils;
use subedit::replay::{self, EditScript};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON edit script and print the resulting pending work
    Replay(ReplayArgs),

    /// Generate shell completions for subedit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Edit script to replay
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Language code of the caption set (overrides the config)
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subedit - change tracking for subtitle authoring sessions
#[derive(Parser, Debug)]
#[command(name = "subedit")]
#[command(version)]
#[command(about = "Replay subtitle edit sessions and inspect their pending work")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The max level is narrowed once the config is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subedit", &mut std::io::stdout());
            Ok(())
        }
        Commands::Replay(args) => run_replay(args),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::from_file(path)
    } else {
        warn!("Config file not found at '{}', using defaults.", path.display());
        Ok(Config::default())
    }
}

fn run_replay(options: ReplayArgs) -> Result<()> {
    let mut config = load_config(&options.config_path)?;

    if let Some(language) = &options.language {
        if !language_utils::language_codes_match(language, &config.language) {
            info!("Overriding configured language '{}' with '{}'", config.language, language);
        }
        config.language = language.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let script = EditScript::from_file(&options.script)?;
    info!(
        "Replaying {} ({} existing captions, {} operations)",
        options.script.display(),
        script.existing.len(),
        script.operations.len()
    );

    let report = replay::replay(&script, &config)?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize replay report")?;
    println!("{}", json);

    if report.unsaved.has_unsaved_work() {
        warn!("Session ends with unsaved work: {}", report.pending);
    }

    Ok(())
}
