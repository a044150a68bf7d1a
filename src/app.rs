//! Command execution for the `civic-prefs` binary.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::{Args, Command};
use crate::config::{Settings, default_store_path};
use crate::context::{MountOptions, PreferenceContext};
use crate::error::AppError;
use crate::platform::{AppearanceChannel, AppearanceNotifier, detect_terminal_scheme};
use crate::storage::{FileStore, KeyValueStore};
use crate::theme::color_hex;

/// Labels shown by `show`, in display order.
const SHOW_KEYS: [&str; 6] = [
    "app_name",
    "login",
    "report_issue",
    "pending",
    "in_progress",
    "resolved",
];

/// What: Resolve which store file to use.
///
/// Output:
/// - `--store`, else `store_path` from settings, else the default path.
#[must_use]
pub fn resolve_store_path(args: &Args, settings: &Settings) -> PathBuf {
    args.store
        .clone()
        .or_else(|| settings.store_path.clone())
        .unwrap_or_else(default_store_path)
}

/// What: Run the requested command against the preference store.
///
/// Inputs:
/// - `args`: Parsed command line.
/// - `settings`: Parsed `settings.conf`.
///
/// Output:
/// - Text to print on stdout.
///
/// # Errors
/// - `AppError::Store` when a requested change could not be persisted. The
///   in-memory change has already been applied at that point.
pub async fn run(args: &Args, settings: &Settings) -> Result<String, AppError> {
    let store_path = resolve_store_path(args, settings);
    tracing::info!(path = %store_path.display(), "using preference store");
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(store_path));
    let appearance: Option<Arc<dyn AppearanceNotifier>> = if settings.follow_system_theme {
        Some(Arc::new(AppearanceChannel::new(detect_terminal_scheme())))
    } else {
        None
    };
    let ctx = PreferenceContext::mount(store, MountOptions::from_settings(settings, appearance)).await;
    let result = execute(&ctx, args.command.clone().unwrap_or(Command::Show)).await;
    if !ctx.unmount().await {
        tracing::warn!("preference writer stopped before draining");
    }
    result
}

/// What: Execute one command on a mounted context.
///
/// Output:
/// - Rendered output for stdout.
///
/// # Errors
/// - `AppError::Store` when the write triggered by the command failed.
pub async fn execute(ctx: &PreferenceContext, command: Command) -> Result<String, AppError> {
    match command {
        Command::Show => Ok(render_show(ctx)),
        Command::Language { locale } => {
            let language = ctx.language();
            let before = language.current_locale();
            let ticket = match locale {
                Some(l) => language.set_locale(l),
                None => language.toggle_locale(),
            };
            ticket.wait().await?;
            let after = language.current_locale();
            Ok(format!(
                "{}: {} -> {} ({})\n",
                language.resolve("language"),
                before,
                after,
                after.native_name()
            ))
        }
        Command::Theme { scheme } => {
            let theme = ctx.theme();
            let before = theme.scheme();
            let ticket = match scheme {
                Some(s) => theme.set_theme(s.is_dark()),
                None => theme.toggle_theme(),
            };
            ticket.wait().await?;
            let label = if theme.is_dark() { "dark_mode" } else { "light_mode" };
            Ok(format!(
                "{}: {} -> {}\n",
                ctx.language().resolve(label),
                before,
                theme.scheme()
            ))
        }
        Command::Translate { keys } => {
            let language = ctx.language();
            let mut out = String::new();
            for key in keys {
                let _ = writeln!(out, "{key} = {}", language.resolve(&key));
            }
            Ok(out)
        }
        Command::Keys => {
            let mut out = String::new();
            for key in ctx.language().table().keys() {
                let _ = writeln!(out, "{key}");
            }
            Ok(out)
        }
    }
}

/// What: Render the current preferences.
///
/// Output:
/// - Locale, theme, preference source, color tokens and sample labels.
///
/// Details:
/// - Headers are translated; locale codes, scheme names, the source tag and
///   token names are identifiers and stay as-is.
#[must_use]
pub fn render_show(ctx: &PreferenceContext) -> String {
    let language = ctx.language();
    let theme_store = ctx.theme();
    let locale = language.current_locale();
    let theme = theme_store.active_theme();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {locale} ({})",
        language.resolve("language"),
        locale.native_name()
    );
    let source = if theme_store.has_user_preference() {
        "user"
    } else if ctx.follows_appearance() {
        "system"
    } else {
        "default"
    };
    let _ = writeln!(out, "{}: {} [{source}]", language.resolve("theme"), theme.scheme());
    for (name, color) in theme.tokens() {
        let _ = writeln!(out, "  {name:<16}{}", color_hex(color));
    }
    let _ = writeln!(out, "{}:", language.resolve("labels"));
    for key in SHOW_KEYS {
        let _ = writeln!(out, "  {key:<16}{}", language.resolve(key));
    }
    out
}
