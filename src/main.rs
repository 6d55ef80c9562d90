// src/main.rs

use clap::{Parser, Subcommand};
use kana_filter::VocabAppLogic;
use kana_filter::app_logic::ui_constants::{APP_NAME, DEFAULT_DICTIONARY_FILENAME, LOG_FILENAME};
use kana_filter::console_layer::ConsoleHost;
use kana_filter::console_layer::render::ConsoleRenderer;
use kana_filter::core::{CoreDictionaryLoader, CorePreferenceStore, dictionary, path_utils};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::cmp::max;
use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Show dictionary words whose readings use only the hiragana you know.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Dictionary document: a JSON array of entries with a `reading` field.
    #[arg(long, default_value = DEFAULT_DICTIONARY_FILENAME)]
    dictionary: PathBuf,

    /// Directory for preferences and the log file. Defaults to the per-user
    /// configuration directory.
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Log level for the terminal.
    #[arg(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,

    /// Raise logging to at least Debug and add timestamps.
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Disable colored output.
    #[arg(long, default_value_t = false)]
    no_colors: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reduce a raw JMdict JSON export to the dictionary format read by this tool.
    Convert { input: PathBuf, output: PathBuf },
}

/*
 * Terminal logging goes to stderr so it does not interleave with the table on
 * stdout. When a configuration directory is available, everything at Info and
 * above is also appended to a log file with UTC timestamps.
 */
fn init_logging(cli: &Cli, config_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if cli.debug {
        max(LevelFilter::Debug, cli.log_level)
    } else {
        cli.log_level
    };

    let mut term_config = ConfigBuilder::new();
    if cli.debug {
        term_config.set_time_level(LevelFilter::Error);
        term_config.set_time_format_rfc3339();
        term_config.set_location_level(LevelFilter::Error);
    } else {
        term_config.set_time_level(LevelFilter::Off);
        term_config.set_thread_level(LevelFilter::Off);
        term_config.set_target_level(LevelFilter::Off);
        term_config.set_location_level(LevelFilter::Off);
    }
    let color_choice = if cli.no_colors {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        log_level,
        term_config.build(),
        TerminalMode::Stderr,
        color_choice,
    )];

    if let Some(dir) = config_dir {
        let log_path = dir.join(LOG_FILENAME);
        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => {
                let mut file_config = ConfigBuilder::new();
                file_config.set_time_offset(time::UtcOffset::UTC);
                file_config.set_time_format_rfc3339();
                loggers.push(WriteLogger::new(
                    max(LevelFilter::Info, log_level),
                    file_config.build(),
                    file,
                ));
            }
            Err(e) => eprintln!("Could not open log file {}: {e}", log_path.display()),
        }
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_dir = path_utils::resolve_config_dir(cli.config_dir.as_deref(), APP_NAME);
    init_logging(&cli, config_dir.as_deref())?;
    log::debug!("Parsed arguments: {cli:?}");

    if let Some(Commands::Convert { input, output }) = &cli.command {
        let count = dictionary::convert_jmdict_file(input, output)?;
        println!("Wrote {count} entries to {}", output.display());
        return Ok(());
    }

    let store = Arc::new(CorePreferenceStore::new(config_dir.as_deref(), APP_NAME)?);
    let logic = VocabAppLogic::new(store);
    let use_colors = !cli.no_colors && io::stdout().is_terminal();
    let host = ConsoleHost::new(
        logic,
        Arc::new(CoreDictionaryLoader::new()),
        cli.dictionary.clone(),
        ConsoleRenderer::new(io::stdout(), use_colors),
    );

    println!("Type 'help' for commands.");
    host.spawn_stdin_reader();
    host.run()?;
    Ok(())
}
