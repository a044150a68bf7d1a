//! Language preference store and translation resolution.

use std::sync::{PoisonError, RwLock};

use super::observer::{Observers, Subscription};
use super::persist::{Persister, WriteTicket};
use crate::i18n::{Locale, TranslationTable, format_placeholders};
use crate::storage::{KeyValueStore, LANGUAGE_KEY};

/// In-memory language state.
#[derive(Clone, Copy, Debug)]
struct LanguageState {
    /// Active locale.
    locale: Locale,
    /// Set once the user picked a locale in this process.
    user_set: bool,
}

/// Single source of truth for the active locale.
///
/// Reads never fail. Mutations update memory and notify subscribers before
/// returning; the write to storage happens in the background.
#[derive(Debug)]
pub struct LanguageStore {
    /// Current state.
    state: RwLock<LanguageState>,
    /// Subscribers notified with the new locale.
    observers: Observers<Locale>,
    /// Background writer.
    persister: Persister,
    /// Table used by [`LanguageStore::resolve`].
    table: &'static TranslationTable,
}

impl LanguageStore {
    /// What: Create a store at `initial` using the built-in translations.
    ///
    /// Details:
    /// - Nothing is read or written; call [`LanguageStore::load_persisted`] to
    ///   apply a previously saved choice.
    #[must_use]
    pub fn new(persister: Persister, initial: Locale) -> Self {
        Self::with_table(persister, initial, TranslationTable::builtin())
    }

    /// Create a store resolving against `table`.
    #[must_use]
    pub fn with_table(
        persister: Persister,
        initial: Locale,
        table: &'static TranslationTable,
    ) -> Self {
        Self {
            state: RwLock::new(LanguageState {
                locale: initial,
                user_set: false,
            }),
            observers: Observers::new(),
            persister,
            table,
        }
    }

    /// Active locale.
    #[must_use]
    pub fn current_locale(&self) -> Locale {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .locale
    }

    /// What: Switch to `locale` and persist it.
    ///
    /// Output:
    /// - Ticket for the background write; may be ignored.
    ///
    /// Details:
    /// - Memory is updated and subscribers notified before this returns
    ///   (only when the locale actually changed).
    /// - The write is always enqueued, so storage converges on the latest
    ///   choice even if it was already active.
    pub fn set_locale(&self, locale: Locale) -> WriteTicket {
        let previous = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let previous = state.locale;
            state.locale = locale;
            state.user_set = true;
            previous
        };
        tracing::info!(from = %previous, to = %locale, "language changed");
        if previous != locale {
            self.observers.notify(&locale);
        }
        self.persister.persist(LANGUAGE_KEY, locale.code())
    }

    /// Switch to the next locale in [`Locale::ALL`] and persist it.
    pub fn toggle_locale(&self) -> WriteTicket {
        self.set_locale(self.current_locale().next())
    }

    /// What: Translate `key` for the active locale.
    ///
    /// Output:
    /// - Active-locale string, else default-locale string, else `key`.
    #[must_use]
    pub fn resolve(&self, key: &str) -> String {
        self.table.resolve(key, self.current_locale())
    }

    /// Translate `key` and fill `{}` placeholders with `args` in order.
    #[must_use]
    pub fn resolve_fmt(&self, key: &str, args: &[&dyn std::fmt::Display]) -> String {
        format_placeholders(&self.resolve(key), args)
    }

    /// Table this store resolves against.
    #[must_use]
    pub const fn table(&self) -> &'static TranslationTable {
        self.table
    }

    /// Register `callback` for locale changes; drop the guard to unregister.
    pub fn subscribe(&self, callback: impl Fn(&Locale) + Send + Sync + 'static) -> Subscription {
        self.observers.subscribe(callback)
    }

    /// What: Apply the persisted locale, if any.
    ///
    /// Inputs:
    /// - `store`: Storage to read [`LANGUAGE_KEY`] from.
    ///
    /// Output:
    /// - Locale now active.
    ///
    /// Details:
    /// - Absent, unrecognized or unreadable values keep the current locale;
    ///   the latter two are logged.
    /// - A choice the user made while the read was in flight is kept.
    pub async fn load_persisted(&self, store: &dyn KeyValueStore) -> Locale {
        let persisted = match store.get(LANGUAGE_KEY).await {
            Ok(Some(code)) => {
                let parsed = Locale::from_code(&code);
                if parsed.is_none() {
                    tracing::warn!(value = %code, "ignoring unrecognized persisted language");
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted language; using default");
                None
            }
        };
        let Some(locale) = persisted else {
            return self.current_locale();
        };
        let changed = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if state.user_set {
                tracing::debug!(persisted = %locale, current = %state.locale, "keeping language chosen during startup");
                return state.locale;
            }
            let changed = state.locale != locale;
            state.locale = locale;
            changed
        };
        tracing::info!(locale = %locale, "restored persisted language");
        if changed {
            self.observers.notify(&locale);
        }
        locale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// What: Build a store over a fresh memory backend.
    ///
    /// Output:
    /// - Backend and store starting at the default locale.
    fn fresh() -> (Arc<MemoryStore>, LanguageStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = LanguageStore::new(Persister::spawn(backend.clone()), Locale::default());
        (backend, store)
    }

    #[tokio::test]
    /// What: Empty store starts in English; toggling switches to Hindi.
    ///
    /// Inputs:
    /// - Fresh store, one toggle.
    ///
    /// Output:
    /// - `en` then `hi`; "login" resolves to the Hindi string; `hi` persisted.
    async fn toggle_from_default_switches_to_hindi() {
        let (backend, store) = fresh();
        assert_eq!(store.load_persisted(backend.as_ref()).await, Locale::En);
        assert_eq!(store.resolve("login"), "Login");
        let ticket = store.toggle_locale();
        assert_eq!(store.current_locale(), Locale::Hi);
        assert_eq!(store.resolve("login"), "लॉगिन");
        ticket.wait().await.expect("persisted");
        assert_eq!(backend.value(LANGUAGE_KEY), Some("hi".to_string()));
    }

    #[tokio::test]
    /// What: Subscribers see each change once, synchronously.
    ///
    /// Inputs:
    /// - Subscriber recording locales; set hi, set hi again, toggle.
    ///
    /// Output:
    /// - Recorded `[hi, en]`; repeated set of the same locale is silent.
    async fn subscribers_notified_on_change_only() {
        let (_backend, store) = fresh();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = Arc::clone(&seen);
        let _sub = store.subscribe(move |l| seen2.lock().expect("seen").push(*l));
        let _ = store.set_locale(Locale::Hi);
        let _ = store.set_locale(Locale::Hi);
        let _ = store.toggle_locale();
        assert_eq!(*seen.lock().expect("seen"), vec![Locale::Hi, Locale::En]);
    }

    #[tokio::test]
    /// What: A failing backend never affects the in-memory value.
    ///
    /// Inputs:
    /// - Backend with writes switched to fail.
    ///
    /// Output:
    /// - Locale updates immediately; the ticket reports the failure.
    async fn write_failure_keeps_memory_value() {
        let (backend, store) = fresh();
        backend.fail_writes(true);
        let ticket = store.set_locale(Locale::Hi);
        assert_eq!(store.current_locale(), Locale::Hi);
        assert!(ticket.wait().await.is_err());
        assert_eq!(store.current_locale(), Locale::Hi);
    }

    #[tokio::test]
    /// What: Persisted values are adopted only when valid and not overridden.
    ///
    /// Inputs:
    /// - Backend holding "hi", then "xx", then a read failure, then a user
    ///   choice made before loading.
    ///
    /// Output:
    /// - "hi" adopted with one notification; others keep the current locale.
    async fn load_persisted_cases() {
        let backend = MemoryStore::with_entries([(LANGUAGE_KEY, "hi")]);
        let store = LanguageStore::new(
            Persister::spawn(Arc::new(MemoryStore::new())),
            Locale::En,
        );
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = Arc::clone(&hits);
        let _sub = store.subscribe(move |_| {
            hits2.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.load_persisted(&backend).await, Locale::Hi);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let garbage = MemoryStore::with_entries([(LANGUAGE_KEY, "xx")]);
        let fresh_store = LanguageStore::new(
            Persister::spawn(Arc::new(MemoryStore::new())),
            Locale::En,
        );
        assert_eq!(fresh_store.load_persisted(&garbage).await, Locale::En);

        let broken = MemoryStore::with_entries([(LANGUAGE_KEY, "hi")]);
        broken.fail_reads(true);
        assert_eq!(fresh_store.load_persisted(&broken).await, Locale::En);

        let _ = fresh_store.set_locale(Locale::En);
        assert_eq!(fresh_store.load_persisted(&backend).await, Locale::En);
    }

    #[tokio::test]
    /// What: Formatted lookups and fallbacks for keys outside the table.
    async fn resolve_fmt_and_missing_key() {
        let (_backend, store) = fresh();
        assert_eq!(store.resolve_fmt("welcome_user", &[&"Asha"]), "Welcome, Asha");
        let _ = store.set_locale(Locale::Hi);
        assert_eq!(store.resolve_fmt("days", &[&3]), "3 दिन");
        assert_eq!(store.resolve("no.such.key"), "no.such.key");
    }
}
