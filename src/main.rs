// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::{Config, Profile};
use app_controller::{Controller, RunOptions};

mod align_cache;
mod aligner;
mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod language_utils;
mod subtitles;
mod textgrid;
mod transcript;

/// CLI Wrapper for Profile to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProfile {
    Shorts,
    Long,
}

impl From<CliProfile> for Profile {
    fn from(cli_profile: CliProfile) -> Self {
        match cli_profile {
            CliProfile::Shorts => Profile::Shorts,
            CliProfile::Long => Profile::Long,
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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate SRT subtitles from an audio file and its script (default command)
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Generate shell completions for alignsrt
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Audio file (wav/mp3), or a directory to process in batch mode
    #[arg(value_name = "AUDIO_PATH")]
    audio_path: PathBuf,

    /// Script text file (omit in batch mode; scripts are paired by stem)
    #[arg(value_name = "SCRIPT_PATH")]
    script_path: Option<PathBuf>,

    /// Cue width profile for the target video format
    #[arg(short, long, value_enum)]
    profile: Option<CliProfile>,

    /// Max characters per cue line (overrides the profile preset)
    #[arg(long)]
    max_line_chars: Option<usize>,

    /// Output SRT path (default: <script stem>_<Profile>.srt next to the script)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Script language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Pronunciation dictionary path or aligner-managed name
    #[arg(short, long)]
    dictionary: Option<String>,

    /// Acoustic model path or aligner-managed name
    #[arg(short = 'm', long)]
    acoustic_model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep the raw TextGrid next to the generated SRT
    #[arg(long)]
    keep_textgrid: bool,

    /// Bypass the alignment cache
    #[arg(long)]
    no_cache: bool,
}

/// alignsrt - Forced-alignment SRT subtitle generator
///
/// Aligns a narration audio file against its script with the Montreal
/// Forced Aligner and turns the word timings into a ready-to-use SRT file.
#[derive(Parser, Debug)]
#[command(name = "alignsrt")]
#[command(version = "1.0.0")]
#[command(about = "Forced-alignment SRT subtitle generator")]
#[command(long_about = "alignsrt runs the Montreal Forced Aligner on an audio/script pair, restores the
script's original casing and punctuation on the aligned words, groups the words
into subtitle-length cues, and writes a standard SRT file.

EXAMPLES:
    alignsrt narration.wav script.txt             # Generate with default config
    alignsrt -p long narration.wav script.txt     # Wide cues for horizontal video
    alignsrt -f narration.mp3 script.txt          # Force overwrite existing output
    alignsrt -l es audio.wav guion.txt            # Spanish model and dictionary
    alignsrt --keep-textgrid a.wav s.txt          # Also keep the raw TextGrid
    alignsrt /recordings/                         # Batch: pair *.txt with audio by stem
    alignsrt completions bash > alignsrt.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

PROFILES:
    shorts - vertical/short-form video, max 30 characters per cue (default)
    long   - horizontal/long-form video, max 60 characters per cue

REQUIREMENTS:
    The Montreal Forced Aligner ('mfa') must be installed and resolvable on
    PATH, with an acoustic model and dictionary for the script language
    (downloadable via 'mfa model download').")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Audio file (wav/mp3), or a directory to process in batch mode
    #[arg(value_name = "AUDIO_PATH")]
    audio_path: Option<PathBuf>,

    /// Script text file (omit in batch mode; scripts are paired by stem)
    #[arg(value_name = "SCRIPT_PATH")]
    script_path: Option<PathBuf>,

    /// Cue width profile for the target video format
    #[arg(short, long, value_enum)]
    profile: Option<CliProfile>,

    /// Max characters per cue line (overrides the profile preset)
    #[arg(long)]
    max_line_chars: Option<usize>,

    /// Output SRT path (default: <script stem>_<Profile>.srt next to the script)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Script language code (e.g., 'en', 'es', 'fr')
    #[arg(short, long)]
    language: Option<String>,

    /// Pronunciation dictionary path or aligner-managed name
    #[arg(short, long)]
    dictionary: Option<String>,

    /// Acoustic model path or aligner-managed name
    #[arg(short = 'm', long)]
    acoustic_model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Keep the raw TextGrid next to the generated SRT
    #[arg(long)]
    keep_textgrid: bool,

    /// Bypass the alignment cache
    #[arg(long)]
    no_cache: bool,
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

    // @returns: ANSI color code for log level
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
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
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
            generate(shell, &mut cmd, "alignsrt", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let audio_path = cli
                .audio_path
                .ok_or_else(|| anyhow!("AUDIO_PATH is required when no subcommand is specified"))?;

            let generate_args = GenerateArgs {
                audio_path,
                script_path: cli.script_path,
                profile: cli.profile,
                max_line_chars: cli.max_line_chars,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                language: cli.language,
                dictionary: cli.dictionary,
                acoustic_model: cli.acoustic_model,
                config_path: cli.config_path,
                log_level: cli.log_level,
                keep_textgrid: cli.keep_textgrid,
                no_cache: cli.no_cache,
            };
            run_generate(generate_args).await
        }
    }
}

async fn run_generate(options: GenerateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level_filter_for(&config_log_level));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let config = if Path::new(config_path).exists() {
        // Load existing configuration
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        // Override config with CLI options if provided
        apply_cli_overrides(&mut config, &options);

        config
    } else {
        // Create default configuration if not exists
        warn!("Config file not found at '{}', creating default config.", config_path);

        let mut config = Config::default();
        apply_cli_overrides(&mut config, &options);

        // Save default config
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter_for(&config.log_level));
    }

    // Create controller
    let controller = Controller::with_config(config)?;

    if options.audio_path.is_dir() {
        // Batch mode: the directory holds script/audio pairs
        if options.script_path.is_some() {
            return Err(anyhow!(
                "SCRIPT_PATH must be omitted when AUDIO_PATH is a directory"
            ));
        }
        controller
            .run_folder(options.audio_path, options.force_overwrite)
            .await
    } else {
        let script_path = options
            .script_path
            .ok_or_else(|| anyhow!("SCRIPT_PATH is required when AUDIO_PATH is a file"))?;

        let run_options = RunOptions {
            output: options.output,
            force_overwrite: options.force_overwrite,
            keep_textgrid: options.keep_textgrid,
            no_cache: options.no_cache,
        };
        controller
            .run(options.audio_path, script_path, run_options)
            .await
            .map(|_| ())
    }
}

fn apply_cli_overrides(config: &mut Config, options: &GenerateArgs) {
    if let Some(profile) = &options.profile {
        config.profile = profile.clone().into();
    }

    if let Some(max_line_chars) = options.max_line_chars {
        config.max_line_chars = Some(max_line_chars);
    }

    if let Some(language) = &options.language {
        config.language = language.clone();
    }

    if let Some(dictionary) = &options.dictionary {
        config.aligner.dictionary = Some(dictionary.clone());
    }

    if let Some(acoustic_model) = &options.acoustic_model {
        config.aligner.acoustic_model = Some(acoustic_model.clone());
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn level_filter_for(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}
