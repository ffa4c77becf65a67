// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, TranslationEngine};
use app_controller::Controller;
use token_counter::TokenCounter;
use translator::TranslationRouter;

mod app_config;
mod app_controller;
mod clipboard;
mod clipboard_monitor;
mod engines;
mod errors;
mod language_utils;
mod text_analyzer;
mod token_counter;
mod translator;

/// CLI Wrapper for TranslationEngine to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationEngine {
    #[value(name = "openai")]
    OpenAI,
    #[value(name = "gemini")]
    Gemini,
    #[value(name = "deepseek")]
    DeepSeek,
}

impl From<CliTranslationEngine> for TranslationEngine {
    fn from(cli_engine: CliTranslationEngine) -> Self {
        match cli_engine {
            CliTranslationEngine::OpenAI => TranslationEngine::OpenAI,
            CliTranslationEngine::Gemini => TranslationEngine::Gemini,
            CliTranslationEngine::DeepSeek => TranslationEngine::DeepSeek,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch the clipboard and translate what lands on it (default command)
    Watch(WatchArgs),

    /// Probe whether the selected engine accepts the configured API key
    Test(TestArgs),

    /// Show the monthly token usage ledger
    Usage(UsageArgs),

    /// Generate shell completions for cliptrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct WatchArgs {
    /// Translation engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliTranslationEngine>,

    /// Source language code (e.g., 'pt', 'en', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'pt', 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Tone requested in the translation instruction
    #[arg(long)]
    tone: Option<String>,

    /// Context prepended to the translation instruction
    #[arg(long)]
    context: Option<String>,

    /// API key for the selected engine
    #[arg(short = 'k', long, env = "CLIPTRANS_API_KEY")]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = app_config::DEFAULT_CONFIG_FILE)]
    config_path: String,

    /// Token usage ledger path
    #[arg(long, default_value = token_counter::DEFAULT_USAGE_FILE)]
    usage_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct TestArgs {
    /// Translation engine to probe
    #[arg(short, long, value_enum)]
    engine: Option<CliTranslationEngine>,

    /// API key to probe with
    #[arg(short = 'k', long, env = "CLIPTRANS_API_KEY")]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = app_config::DEFAULT_CONFIG_FILE)]
    config_path: String,
}

#[derive(Parser, Debug)]
struct UsageArgs {
    /// Restrict the report to one engine
    #[arg(short, long, value_enum)]
    engine: Option<CliTranslationEngine>,

    /// Token usage ledger path
    #[arg(long, default_value = token_counter::DEFAULT_USAGE_FILE)]
    usage_path: String,
}

/// cliptrans - clipboard translation in the background
///
/// Watches the system clipboard and replaces copied text with its translation
/// using a configurable engine (OpenAI live, Gemini and DeepSeek simulated).
#[derive(Parser, Debug)]
#[command(name = "cliptrans")]
#[command(version = "0.1.0")]
#[command(about = "Clipboard translation utility")]
#[command(long_about = "cliptrans watches the system clipboard and translates copied text in place.

Copied text is classified first: code snippets are left untouched, prose is
sent to the selected translation engine and the clipboard is updated with the
result. Token usage is tracked per month in a local ledger.

EXAMPLES:
    cliptrans                                  # Watch using default config
    cliptrans -e gemini                        # Watch with the Gemini engine
    cliptrans -s pt -t en                      # Portuguese to English
    cliptrans --tone formal --context 'Email to a client'
    cliptrans test -e openai -k sk-...         # Probe the live API
    cliptrans usage                            # Monthly token report
    cliptrans completions bash > cliptrans.bash

CONFIGURATION:
    Settings are stored in translator_config.json by default. You can specify
    a different file with --config-path. If the file doesn't exist, a default
    one will be created automatically.

SUPPORTED ENGINES:
    openai    - OpenAI chat API (requires API key)
    gemini    - Gemini 2.0 (simulated, no network traffic)
    deepseek  - DeepSeek V3 (simulated, no network traffic)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Translation engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliTranslationEngine>,

    /// Source language code (e.g., 'pt', 'en', 'fr')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'pt', 'en', 'fr')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Tone requested in the translation instruction
    #[arg(long)]
    tone: Option<String>,

    /// Context prepended to the translation instruction
    #[arg(long)]
    context: Option<String>,

    /// API key for the selected engine
    #[arg(short = 'k', long, env = "CLIPTRANS_API_KEY")]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = app_config::DEFAULT_CONFIG_FILE)]
    config_path: String,

    /// Token usage ledger path
    #[arg(long, default_value = token_counter::DEFAULT_USAGE_FILE)]
    usage_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color prefix for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "cliptrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Test(args)) => run_test(args).await,
        Some(Commands::Usage(args)) => run_usage(args),
        Some(Commands::Watch(args)) => run_watch(args).await,
        None => {
            // Default behavior - use top-level args as an implicit watch
            let watch_args = WatchArgs {
                engine: cli.engine,
                source_language: cli.source_language,
                target_language: cli.target_language,
                tone: cli.tone,
                context: cli.context,
                api_key: cli.api_key,
                config_path: cli.config_path,
                usage_path: cli.usage_path,
                log_level: cli.log_level,
            };
            run_watch(watch_args).await
        }
    }
}

async fn run_watch(options: WatchArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = Config::load_or_create(config_path)?;

    // Override config with CLI options if provided
    if let Some(engine) = options.engine {
        config.api_engine = engine.into();
    }
    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }
    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }
    if let Some(tone) = &options.tone {
        config.tone = tone.clone();
    }
    if let Some(context) = &options.context {
        config.context = context.clone();
    }
    if let Some(api_key) = &options.api_key {
        config.api_key = api_key.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    let ledger = TokenCounter::load(&options.usage_path);
    let mut controller = Controller::new(config, PathBuf::from(config_path), ledger);
    controller.run().await
}

async fn run_test(options: TestArgs) -> Result<()> {
    // The probe works from the saved settings unless overridden on the CLI
    let mut config = if Path::new(&options.config_path).exists() {
        Config::from_file(&options.config_path)?
    } else {
        Config::default()
    };

    if let Some(engine) = options.engine {
        config.api_engine = engine.into();
    }
    if let Some(api_key) = &options.api_key {
        config.api_key = api_key.clone();
    }

    let router = TranslationRouter::new();
    let engine_id = config.api_engine.to_lowercase_string();
    let (success, message) = router.test_connection(&engine_id, &config.api_key).await;

    if success {
        println!("{}: {}", config.api_engine.display_name(), message);
        Ok(())
    } else {
        Err(anyhow!(
            "{} connection test failed: {}",
            config.api_engine.display_name(),
            message
        ))
    }
}

fn run_usage(options: UsageArgs) -> Result<()> {
    let ledger = TokenCounter::load(&options.usage_path);

    match options.engine {
        Some(engine) => {
            let engine: TranslationEngine = engine.into();
            let name = engine.display_name();
            let by_month: Vec<(String, u64)> = ledger
                .usage_by_month(Some(name))
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .collect();
            if by_month.is_empty() {
                println!("No token usage recorded for {}", name);
                return Ok(());
            }
            println!("Token usage for {}:", name);
            for (month, count) in by_month {
                println!("  {}  {}", month, count);
            }
            println!(
                "Current month: {} tokens",
                ledger.current_month_usage(Some(name))
            );
            println!("All time: {} tokens", ledger.total_usage(Some(name)));
        }
        None => println!("{}", ledger.summary()),
    }
    Ok(())
}
