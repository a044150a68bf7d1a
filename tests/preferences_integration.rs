//! Integration tests for the preference stores.
//!
//! Tests cover:
//! - Translation lookup and fallback through the language store
//! - Cold-start restoration from a file-backed store
//! - Fire-and-forget writes against failing storage
//! - Platform appearance adoption and explicit override

#![cfg(test)]

use std::sync::{Arc, Mutex};

use civic_prefs::i18n::{Locale, TranslationTable};
use civic_prefs::platform::AppearanceChannel;
use civic_prefs::prefs::{LanguageStore, Persister, ThemeStore};
use civic_prefs::storage::{FileStore, KeyValueStore, LANGUAGE_KEY, MemoryStore, THEME_KEY};
use civic_prefs::theme::{ColorScheme, DARK_THEME};
use civic_prefs::{MountOptions, PreferenceContext};

/// What: Leak a small table so it can back a `LanguageStore`.
///
/// Output:
/// - Table with a complete key, an English-only key and a Hindi-only key.
fn partial_table() -> &'static TranslationTable {
    Box::leak(Box::new(TranslationTable::from_triples([
        ("login", Locale::En, "Login"),
        ("login", Locale::Hi, "लॉगिन"),
        ("pending", Locale::En, "Pending"),
        ("hi_only", Locale::Hi, "केवल हिन्दी"),
    ])))
}

#[tokio::test]
/// What: `resolve` honours locale, default and raw-key tiers for every locale.
///
/// Inputs:
/// - Partial table; each supported locale in turn.
///
/// Output:
/// - `[K][L]` when present, else `[K][en]`, else `K`.
async fn integration_resolve_fallback_for_all_locales() {
    let table = partial_table();
    let store = LanguageStore::with_table(
        Persister::spawn(Arc::new(MemoryStore::new())),
        Locale::En,
        table,
    );
    for locale in Locale::ALL {
        let _ = store.set_locale(locale);
        for key in ["login", "pending", "hi_only", "absent"] {
            let expected = table
                .get(key, locale)
                .or_else(|| table.get(key, Locale::default()))
                .unwrap_or(key);
            assert_eq!(store.resolve(key), expected, "key {key} locale {locale}");
        }
    }
}

#[tokio::test]
/// What: Toggling twice restores the original locale.
async fn integration_toggle_locale_involution() {
    let store = LanguageStore::new(
        Persister::spawn(Arc::new(MemoryStore::new())),
        Locale::default(),
    );
    for start in Locale::ALL {
        let _ = store.set_locale(start);
        let _ = store.toggle_locale();
        let _ = store.toggle_locale();
        assert_eq!(store.current_locale(), start);
    }
}

#[tokio::test]
/// What: Empty store -> English -> toggle -> Hindi -> "login" in Devanagari.
async fn integration_scenario_toggle_language_from_empty_store() {
    let backend = Arc::new(MemoryStore::new());
    let ctx = PreferenceContext::mount(backend.clone(), MountOptions::default()).await;
    let language = Arc::clone(ctx.language());
    assert_eq!(language.current_locale(), Locale::En);
    let _ = language.toggle_locale();
    assert_eq!(language.current_locale(), Locale::Hi);
    assert_eq!(language.resolve("login"), "लॉगिन");
    assert!(ctx.unmount().await);
    assert_eq!(backend.value(LANGUAGE_KEY), Some("hi".to_string()));
}

#[tokio::test]
/// What: A choice survives a cold start through the file store.
///
/// Inputs:
/// - Context over a temp file; `set_locale(hi)` and `set_theme(true)`;
///   unmount; remount over a fresh `FileStore` at the same path.
///
/// Output:
/// - Remounted context reports Hindi and the dark palette.
async fn integration_cold_start_restores_choices() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("preferences.json");

    let first = PreferenceContext::mount(Arc::new(FileStore::new(&path)), MountOptions::default()).await;
    let _ = first.language().set_locale(Locale::Hi);
    let _ = first.theme().set_theme(true);
    assert!(first.unmount().await);

    let reread = FileStore::new(&path);
    assert_eq!(
        reread.get(LANGUAGE_KEY).await.expect("read"),
        Some("hi".to_string())
    );

    let second = PreferenceContext::mount(Arc::new(reread), MountOptions::default()).await;
    assert_eq!(second.language().current_locale(), Locale::Hi);
    assert_eq!(*second.theme().active_theme(), DARK_THEME);
    assert!(second.theme().has_user_preference());
}

#[tokio::test]
/// What: Always-failing writes never block or revert setters.
///
/// Inputs:
/// - Backend with writes disabled; subscribers on both stores.
///
/// Output:
/// - Values and notifications update on the same call; nothing persisted.
async fn integration_failing_writes_still_update_memory() {
    let backend = Arc::new(MemoryStore::new());
    backend.fail_writes(true);
    let ctx = PreferenceContext::mount(backend.clone(), MountOptions::default()).await;
    let events = Arc::new(Mutex::new(Vec::new()));
    let e1 = Arc::clone(&events);
    let e2 = Arc::clone(&events);
    let _lang_sub = ctx
        .language()
        .subscribe(move |l| e1.lock().expect("events").push(format!("lang:{l}")));
    let _theme_sub = ctx
        .theme()
        .subscribe(move |t| e2.lock().expect("events").push(format!("dark:{}", t.is_dark)));

    let _ = ctx.language().set_locale(Locale::Hi);
    let _ = ctx.theme().set_theme(true);
    assert_eq!(ctx.language().current_locale(), Locale::Hi);
    assert!(ctx.theme().is_dark());
    assert_eq!(
        *events.lock().expect("events"),
        vec!["lang:hi".to_string(), "dark:true".to_string()]
    );
    assert!(ctx.unmount().await);
    assert!(backend.write_log().is_empty());
}

#[tokio::test]
/// What: Platform dark adopted on first run; explicit light persists and wins.
///
/// Inputs:
/// - Empty store, platform reports dark; `set_theme(false)`; platform
///   reports dark again.
///
/// Output:
/// - Dark with no write; then light persisted and kept.
async fn integration_platform_scheme_then_explicit_choice() {
    let backend = Arc::new(MemoryStore::new());
    let channel = Arc::new(AppearanceChannel::new(Some(ColorScheme::Dark)));
    let options = MountOptions {
        initial_locale: Locale::En,
        appearance: Some(channel.clone()),
    };
    let ctx = PreferenceContext::mount(backend.clone(), options).await;
    assert!(ctx.theme().is_dark());
    assert!(!ctx.theme().has_user_preference());
    assert!(backend.value(THEME_KEY).is_none());

    ctx.theme().set_theme(false).wait().await.expect("persisted");
    channel.emit(ColorScheme::Dark);
    assert!(!ctx.theme().is_dark());
    assert_eq!(backend.value(THEME_KEY), Some("light".to_string()));
    assert!(ctx.unmount().await);
    assert_eq!(channel.listener_count(), 0);
}

#[tokio::test]
/// What: A persisted theme suppresses platform signals from the start.
async fn integration_persisted_theme_ignores_platform() {
    let backend = Arc::new(MemoryStore::with_entries([(THEME_KEY, "light")]));
    let channel = Arc::new(AppearanceChannel::new(Some(ColorScheme::Dark)));
    let theme = Arc::new(ThemeStore::new(Persister::spawn(backend.clone()), None));
    let _guard = theme.follow_platform(channel.as_ref());
    assert!(theme.is_dark());
    assert!(!theme.load_persisted(backend.as_ref()).await);
    channel.emit(ColorScheme::Dark);
    assert!(!theme.is_dark());
}

#[tokio::test]
/// What: A corrupt store file degrades to defaults and is repaired on write.
async fn integration_corrupt_file_degrades_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("preferences.json");
    std::fs::write(&path, "not json at all").expect("write corrupt");
    let ctx = PreferenceContext::mount(Arc::new(FileStore::new(&path)), MountOptions::default()).await;
    assert_eq!(ctx.language().current_locale(), Locale::En);
    assert!(!ctx.theme().is_dark());
    ctx.language()
        .set_locale(Locale::Hi)
        .wait()
        .await
        .expect("write repairs file");
    assert!(ctx.unmount().await);
    let reread = FileStore::new(&path);
    assert_eq!(
        reread.get(LANGUAGE_KEY).await.expect("readable again"),
        Some("hi".to_string())
    );
}
