//! Theme preference store.

use std::sync::{Arc, PoisonError, RwLock};

use super::observer::{Observers, Subscription};
use super::persist::{Persister, WriteTicket};
use crate::platform::AppearanceNotifier;
use crate::storage::{KeyValueStore, THEME_KEY};
use crate::theme::{ColorScheme, Theme, theme_for};

/// In-memory theme state.
#[derive(Clone, Copy, Debug)]
struct ThemeState {
    /// Dark palette active.
    is_dark: bool,
    /// An explicit user choice exists (made now or restored from storage).
    explicit: bool,
}

/// Single source of truth for the active theme.
///
/// The two states (light, dark) are both valid at any time. Only explicit
/// user actions are persisted; platform appearance changes are applied while
/// no explicit choice exists and never written.
#[derive(Debug)]
pub struct ThemeStore {
    /// Current state.
    state: RwLock<ThemeState>,
    /// Subscribers notified with the new active descriptor.
    observers: Observers<&'static Theme>,
    /// Background writer.
    persister: Persister,
}

impl ThemeStore {
    /// What: Create a store.
    ///
    /// Inputs:
    /// - `persister`: Background writer for explicit choices.
    /// - `platform`: Platform-reported scheme to start from, if known.
    ///
    /// Details:
    /// - Starts light when the platform reports nothing.
    #[must_use]
    pub fn new(persister: Persister, platform: Option<ColorScheme>) -> Self {
        Self {
            state: RwLock::new(ThemeState {
                is_dark: platform.is_some_and(ColorScheme::is_dark),
                explicit: false,
            }),
            observers: Observers::new(),
            persister,
        }
    }

    /// Snapshot of the state.
    fn snapshot(&self) -> ThemeState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the dark palette is active.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.snapshot().is_dark
    }

    /// Active color scheme.
    #[must_use]
    pub fn scheme(&self) -> ColorScheme {
        ColorScheme::from_is_dark(self.is_dark())
    }

    /// Active descriptor; one of the two static palettes.
    #[must_use]
    pub fn active_theme(&self) -> &'static Theme {
        theme_for(self.is_dark())
    }

    /// Whether an explicit choice exists, so platform signals are ignored.
    #[must_use]
    pub fn has_user_preference(&self) -> bool {
        self.snapshot().explicit
    }

    /// What: Select the dark (`true`) or light palette and persist the choice.
    ///
    /// Output:
    /// - Ticket for the background write; may be ignored.
    ///
    /// Details:
    /// - Memory is updated and subscribers notified before this returns (only
    ///   when the palette changed); the choice becomes explicit either way.
    pub fn set_theme(&self, is_dark: bool) -> WriteTicket {
        let changed = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let changed = state.is_dark != is_dark;
            state.is_dark = is_dark;
            state.explicit = true;
            changed
        };
        let scheme = ColorScheme::from_is_dark(is_dark);
        tracing::info!(theme = %scheme, "theme changed");
        if changed {
            self.observers.notify(&theme_for(is_dark));
        }
        self.persister.persist(THEME_KEY, scheme.as_config_key())
    }

    /// Flip between light and dark and persist the choice.
    pub fn toggle_theme(&self) -> WriteTicket {
        self.set_theme(!self.is_dark())
    }

    /// What: Apply a platform-reported scheme.
    ///
    /// Output:
    /// - `true` when the scheme was adopted, `false` when an explicit choice
    ///   exists and the signal was ignored.
    ///
    /// Details:
    /// - Nothing is persisted.
    pub fn apply_platform_scheme(&self, scheme: ColorScheme) -> bool {
        let changed = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if state.explicit {
                tracing::debug!(platform = %scheme, "ignoring platform appearance; user preference set");
                return false;
            }
            let changed = state.is_dark != scheme.is_dark();
            state.is_dark = scheme.is_dark();
            changed
        };
        tracing::debug!(platform = %scheme, "following platform appearance");
        if changed {
            self.observers.notify(&theme_for(scheme.is_dark()));
        }
        true
    }

    /// What: Follow `notifier` for as long as the returned guard lives.
    ///
    /// Output:
    /// - Guard; dropping it unregisters from the notifier.
    ///
    /// Details:
    /// - The notifier's current scheme is applied first.
    /// - The registration holds only a weak reference to the store.
    pub fn follow_platform(self: &Arc<Self>, notifier: &dyn AppearanceNotifier) -> Subscription {
        if let Some(scheme) = notifier.current_scheme() {
            self.apply_platform_scheme(scheme);
        }
        let weak = Arc::downgrade(self);
        notifier.subscribe(Box::new(move |scheme: ColorScheme| {
            if let Some(store) = weak.upgrade() {
                store.apply_platform_scheme(scheme);
            }
        }))
    }

    /// Register `callback` for palette changes; drop the guard to unregister.
    pub fn subscribe(
        &self,
        callback: impl Fn(&&'static Theme) + Send + Sync + 'static,
    ) -> Subscription {
        self.observers.subscribe(callback)
    }

    /// What: Apply the persisted theme, if any.
    ///
    /// Inputs:
    /// - `store`: Storage to read [`THEME_KEY`] from.
    ///
    /// Output:
    /// - Whether the dark palette is now active.
    ///
    /// Details:
    /// - A recognized value is adopted and marks the preference explicit.
    /// - Absent, unrecognized or unreadable values leave the state untouched;
    ///   the latter two are logged.
    /// - A choice the user made while the read was in flight is kept.
    pub async fn load_persisted(&self, store: &dyn KeyValueStore) -> bool {
        let persisted = match store.get(THEME_KEY).await {
            Ok(Some(value)) => {
                let parsed = ColorScheme::from_config_key(&value);
                if parsed.is_none() {
                    tracing::warn!(value = %value, "ignoring unrecognized persisted theme");
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read persisted theme; keeping current");
                None
            }
        };
        let Some(scheme) = persisted else {
            return self.is_dark();
        };
        let changed = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            if state.explicit {
                tracing::debug!(persisted = %scheme, "keeping theme chosen during startup");
                return state.is_dark;
            }
            let changed = state.is_dark != scheme.is_dark();
            state.is_dark = scheme.is_dark();
            state.explicit = true;
            changed
        };
        tracing::info!(theme = %scheme, "restored persisted theme");
        if changed {
            self.observers.notify(&theme_for(scheme.is_dark()));
        }
        scheme.is_dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::AppearanceChannel;
    use crate::storage::MemoryStore;
    use crate::theme::{DARK_THEME, LIGHT_THEME};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// What: Build a store over a fresh memory backend.
    fn fresh(platform: Option<ColorScheme>) -> (Arc<MemoryStore>, Arc<ThemeStore>) {
        let backend = Arc::new(MemoryStore::new());
        let store = Arc::new(ThemeStore::new(Persister::spawn(backend.clone()), platform));
        (backend, store)
    }

    #[tokio::test]
    /// What: `set_theme(true)` activates exactly the static dark descriptor.
    ///
    /// Output:
    /// - Every token matches `DARK_THEME`; "dark" persisted.
    async fn set_theme_dark_matches_static_descriptor() {
        let (backend, store) = fresh(None);
        assert_eq!(*store.active_theme(), LIGHT_THEME);
        store.set_theme(true).wait().await.expect("persisted");
        assert!(store.active_theme().is_dark);
        assert_eq!(*store.active_theme(), DARK_THEME);
        assert_eq!(backend.value(THEME_KEY), Some("dark".to_string()));
    }

    #[tokio::test]
    /// What: Toggle twice returns to the start and notifies twice.
    async fn toggle_is_involution() {
        let (_backend, store) = fresh(None);
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = Arc::clone(&hits);
        let _sub = store.subscribe(move |_| {
            hits2.fetch_add(1, Ordering::SeqCst);
        });
        let _ = store.toggle_theme();
        assert!(store.is_dark());
        let _ = store.toggle_theme();
        assert!(!store.is_dark());
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    /// What: Write failures never roll back the in-memory flag.
    async fn write_failure_keeps_state() {
        let (backend, store) = fresh(None);
        backend.fail_writes(true);
        let ticket = store.set_theme(true);
        assert!(store.is_dark());
        assert!(ticket.wait().await.is_err());
        assert!(store.is_dark());
    }

    #[tokio::test]
    /// What: Platform dark is adopted on first run without a write, and an
    /// explicit light choice later wins over platform signals.
    ///
    /// Inputs:
    /// - Empty backend, channel reporting dark, then `set_theme(false)`, then
    ///   another dark signal.
    ///
    /// Output:
    /// - Dark adopted with an empty write log; after the explicit choice only
    ///   "light" is persisted and the later signal is ignored.
    async fn platform_signal_first_run_only() {
        let (backend, store) = fresh(None);
        let channel = AppearanceChannel::new(Some(ColorScheme::Dark));
        let _guard = store.follow_platform(&channel);
        assert!(store.is_dark());
        assert!(!store.has_user_preference());
        assert!(store.persister.flush().await);
        assert!(backend.write_log().is_empty());

        store.set_theme(false).wait().await.expect("persisted");
        channel.emit(ColorScheme::Dark);
        assert!(!store.is_dark());
        assert_eq!(
            backend.write_log(),
            vec![(THEME_KEY.to_string(), "light".to_string())]
        );
    }

    #[tokio::test]
    /// What: Dropping the follow guard unregisters from the notifier.
    async fn follow_guard_releases_listener() {
        let (_backend, store) = fresh(None);
        let channel = AppearanceChannel::new(None);
        let guard = store.follow_platform(&channel);
        assert_eq!(channel.listener_count(), 1);
        channel.emit(ColorScheme::Dark);
        assert!(store.is_dark());
        drop(guard);
        assert_eq!(channel.listener_count(), 0);
        channel.emit(ColorScheme::Light);
        assert!(store.is_dark());
    }

    #[tokio::test]
    /// What: Persisted values become explicit; bad values are ignored.
    ///
    /// Inputs:
    /// - Backends holding "dark", "purple", and one failing reads.
    ///
    /// Output:
    /// - "dark" adopted and platform signals then ignored; others keep state.
    async fn load_persisted_cases() {
        let (_backend, store) = fresh(Some(ColorScheme::Light));
        let saved = MemoryStore::with_entries([(THEME_KEY, "dark")]);
        assert!(store.load_persisted(&saved).await);
        assert!(store.has_user_preference());
        assert!(!store.apply_platform_scheme(ColorScheme::Light));
        assert!(store.is_dark());

        let (_b, other) = fresh(Some(ColorScheme::Dark));
        let bogus = MemoryStore::with_entries([(THEME_KEY, "purple")]);
        assert!(other.load_persisted(&bogus).await);
        assert!(!other.has_user_preference());
        let broken = MemoryStore::new();
        broken.fail_reads(true);
        assert!(other.load_persisted(&broken).await);
        assert!(!other.has_user_preference());
    }

    #[tokio::test]
    /// What: A theme chosen before the persisted read lands is kept.
    ///
    /// Inputs:
    /// - `set_theme(false)` on a fresh store, then a backend holding "dark".
    ///
    /// Output:
    /// - Light stays active, no notification, "light" is what gets written.
    async fn load_persisted_keeps_choice_made_during_startup() {
        let (backend, store) = fresh(None);
        store.set_theme(false).wait().await.expect("persisted");
        let hits = Arc::new(AtomicUsize::new(0));
        let hits2 = Arc::clone(&hits);
        let _sub = store.subscribe(move |_| {
            hits2.fetch_add(1, Ordering::SeqCst);
        });
        let saved = MemoryStore::with_entries([(THEME_KEY, "dark")]);
        assert!(!store.load_persisted(&saved).await);
        assert!(!store.is_dark());
        assert!(store.has_user_preference());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(
            backend.write_log(),
            vec![(THEME_KEY.to_string(), "light".to_string())]
        );
    }
}
