//! Command-line argument definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::i18n::Locale;
use crate::theme::ColorScheme;

/// civic-prefs - inspect and change the civic reporter's language and theme
#[derive(Parser, Debug)]
#[command(name = "civic-prefs")]
#[command(version)]
#[command(about = "Inspect and change the civic reporter's language and theme preferences", long_about = None)]
pub struct Args {
    /// Preference store file (overrides `store_path` in settings.conf)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the active language, theme and a few translated labels (default)
    Show,
    /// Set the language, or toggle it when no code is given
    Language {
        /// Locale code (en, hi)
        locale: Option<Locale>,
    },
    /// Set the theme, or toggle it when no value is given
    Theme {
        /// dark or light
        scheme: Option<ColorScheme>,
    },
    /// Translate one or more keys in the active language
    Translate {
        /// Translation keys (e.g. login pending)
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// List every translation key
    Keys,
}

/// What: Determine the log level from arguments and settings.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
/// - `configured`: `log_level` from settings.conf.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides `--log-level`, which overrides settings.
#[must_use]
pub fn determine_log_level(args: &Args, configured: &str) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level
            .clone()
            .unwrap_or_else(|| configured.to_string())
    }
}
