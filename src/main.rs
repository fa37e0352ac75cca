#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, warn};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use wordlens::app_config::{self, Config};
use wordlens::database::Repository;
use wordlens::errors::{AppError, LookupError};
use wordlens::language_utils::{LANGUAGES, LanguageId, is_valid_language_id, language_name};
use wordlens::providers::{Baidu, LanguageDetector, ProviderTag};
use wordlens::session::{LookupSession, LookupState};
use wordlens::translation::{Orchestrator, TranslateDisplayResult, detect, sectionize_compact};

/// `--log-level` values, same names as `log_level` in `conf.json`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LevelFilter {
    fn from(level: CliLogLevel) -> Self {
        let level = match level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        };
        level.level_filter()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up a word or phrase (default command)
    Lookup(LookupArgs),

    /// Guess the language of a text
    Detect {
        /// Text to inspect
        #[arg(value_name = "TEXT")]
        text: String,

        /// Also ask the remote detector (Baidu)
        #[arg(long)]
        remote: bool,
    },

    /// List supported languages
    Languages,

    /// Maintain the query history
    History {
        /// Delete every entry
        #[arg(long, conflicts_with = "prune_days")]
        clear: bool,

        /// Delete entries not looked up for this many days
        #[arg(long, value_name = "DAYS")]
        prune_days: Option<i64>,
    },

    /// Generate shell completions for wordlens
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct LookupArgs {
    /// Word or phrase to look up
    #[arg(value_name = "TEXT")]
    text: String,

    /// Target language id (e.g. 'en', 'zh-CHS'); defaults to language1
    #[arg(short, long)]
    to: Option<String>,

    /// Only show the primary line
    #[arg(long)]
    compact: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "wordlens",
    version,
    about = "Look up words across several translation providers",
    args_conflicts_with_subcommands = true,
    after_help = "Configuration is stored in conf.json by default. You can specify a different
configuration file with the --config option. A default file is written when none exists;
fill in the Youdao app_key and app_secret before the first lookup."
)]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Word or phrase to look up
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Target language id; defaults to language1
    #[arg(short, long)]
    to: Option<String>,

    /// Only show the primary line
    #[arg(long)]
    compact: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: String,

    /// Override `log_level` from the config file
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// Colored stderr logger with a timestamp and level glyph
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

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
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
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
    // Verbosity is narrowed with log::set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Warn);

    let cli = CommandLineOptions::parse();

    if let Some(level) = cli.log_level {
        log::set_max_level(level.into());
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "wordlens", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Languages) => {
            print_languages();
            Ok(())
        }
        Some(Commands::Detect { text, remote }) => {
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            run_detect(&config, &text, remote).await
        }
        Some(Commands::History { clear, prune_days }) => run_history(clear, prune_days).await,
        Some(Commands::Lookup(args)) => {
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            run_lookup(&config, args).await
        }
        None => {
            let text = cli
                .text
                .ok_or_else(|| anyhow!("TEXT is required when no subcommand is specified"))?;
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            let args = LookupArgs {
                text,
                to: cli.to,
                compact: cli.compact,
                json: cli.json,
            };
            run_lookup(&config, args).await
        }
    }
}

/// Load or create the configuration; applies its log level unless the CLI set one
fn load_config(config_path: &str, cli_log_level: bool) -> Result<Config, AppError> {
    let path = Path::new(config_path);
    let config = if path.try_exists()? {
        Config::from_file(path).map_err(|e| AppError::Config(format!("{:#}", e)))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(path)?;
        config
    };

    if !cli_log_level {
        log::set_max_level(config.log_level.level_filter());
    }

    Ok(config)
}

async fn run_lookup(config: &Config, args: LookupArgs) -> Result<()> {
    config.validate().context("Configuration validation failed")?;

    let orchestrator = Orchestrator::from_config(config)?;
    let session = LookupSession::from_config(orchestrator, config);

    if let Some(to) = &args.to {
        if !is_valid_language_id(to) || to == LanguageId::AUTO {
            return Err(anyhow!("Invalid target language: {}", to));
        }
        session.set_target(LanguageId::from(to.as_str()));
    }

    match Repository::new_default() {
        Ok(repo) => {
            if let Err(e) = repo.record_query(args.text.trim(), chrono::Utc::now().timestamp_millis()).await {
                warn!("Failed to record query history: {}", e);
            }
        }
        Err(e) => debug!("Query history unavailable: {}", e),
    }

    let state = session
        .query(args.text.trim())
        .await
        .ok_or(AppError::Lookup(LookupError::Cancelled))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    match state {
        LookupState::Success { format, sections } => {
            let sections = if args.compact { sectionize_compact(&format) } else { sections };
            let info = &format.query_word_info;
            print_header(&info.word, &info.from_language, &info.to_language);
            print_sections(&sections);
            Ok(())
        }
        LookupState::Failure { code, message, help_url } => {
            println!("{}", message);
            println!("Error code: {}", code);
            println!("Help: {}", help_url);
            Err(anyhow!("Lookup failed with code {}", code))
        }
        LookupState::Idle | LookupState::Loading => Ok(()),
    }
}

async fn run_detect(config: &Config, text: &str, remote: bool) -> Result<()> {
    let preferences = config.preferences();
    preferences.validate()?;

    let local = detect(text, &preferences);
    println!("local: {}", local);

    if remote {
        let baidu_config = config
            .get_active_provider_config(ProviderTag::Baidu)
            .ok_or_else(|| anyhow!("Remote detection needs an enabled baidu provider with credentials"))?;
        let baidu = Baidu::new(
            baidu_config.app_key.clone(),
            baidu_config.app_secret.clone(),
            baidu_config.endpoint.clone(),
            baidu_config.timeout_secs,
        );
        let detector: Arc<dyn LanguageDetector> = Arc::new(baidu);
        let result = detector.detect_language(text).await?;
        let id = result
            .detected_language
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!(
            "remote: {} ({}){}",
            id,
            result.provider_language,
            if result.confirmed { "" } else { " unconfirmed" }
        );
    }

    Ok(())
}

async fn run_history(clear: bool, prune_days: Option<i64>) -> Result<()> {
    let repo = Repository::new_default().map_err(|e| AppError::Database(format!("{:#}", e)))?;

    if clear {
        let deleted = repo.clear().await?;
        println!("Deleted {} history entries", deleted);
    } else if let Some(days) = prune_days {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(days);
        let deleted = repo.prune_older_than(cutoff.timestamp_millis()).await?;
        println!("Deleted {} history entries older than {} days", deleted, days);
    }

    println!("{}", repo.stats().await?);
    Ok(())
}

fn print_languages() {
    for item in LANGUAGES.iter().filter(|item| item.id != LanguageId::AUTO) {
        println!("{:<8} {}", item.id, item.name);
    }
}

fn print_header(word: &str, from: &LanguageId, to: &LanguageId) {
    let name = |id: &LanguageId| language_name(id.as_str()).unwrap_or("Unknown");
    println!("\x1B[1m{}\x1B[0m  {} → {}", word, name(from), name(to));
}

fn print_sections(sections: &[TranslateDisplayResult]) {
    for section in sections {
        if let Some(title) = &section.section_title {
            println!();
            println!("\x1B[1;34m{}\x1B[0m", title);
        }
        for item in &section.items {
            let mut line = item.title.clone();
            if let Some(subtitle) = &item.subtitle {
                if !line.is_empty() {
                    line.push_str("  ");
                }
                line.push_str(subtitle);
            }
            if let Some(phonetic) = &item.phonetic {
                line.push_str(&format!("  [{}]", phonetic));
            }
            if let Some(exam_types) = &item.exam_types {
                line.push_str(&format!("  {}", exam_types.join(" ")));
            }
            println!("  {}", line);
        }
    }
}
