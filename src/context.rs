//! Composition root wiring storage, writer and preference stores.

use std::sync::Arc;

use crate::config::Settings;
use crate::i18n::{Locale, detect_system_locale};
use crate::platform::AppearanceNotifier;
use crate::prefs::{LanguageStore, Persister, Subscription, ThemeStore};
use crate::storage::KeyValueStore;

/// How a [`PreferenceContext`] is set up.
#[derive(Clone, Default)]
pub struct MountOptions {
    /// Locale active until a persisted one is loaded.
    pub initial_locale: Locale,
    /// Platform appearance to follow until the user picks a theme.
    pub appearance: Option<Arc<dyn AppearanceNotifier>>,
}

impl std::fmt::Debug for MountOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountOptions")
            .field("initial_locale", &self.initial_locale)
            .field("follows_appearance", &self.appearance.is_some())
            .finish()
    }
}

impl MountOptions {
    /// What: Derive options from user settings.
    ///
    /// Inputs:
    /// - `settings`: Parsed `settings.conf`.
    /// - `appearance`: Platform notifier, used only when
    ///   `follow_system_theme` is on.
    ///
    /// Output:
    /// - Options with the initial locale from the environment when
    ///   `detect_system_locale` is on, the default locale otherwise.
    #[must_use]
    pub fn from_settings(
        settings: &Settings,
        appearance: Option<Arc<dyn AppearanceNotifier>>,
    ) -> Self {
        let initial_locale = if settings.detect_system_locale {
            detect_system_locale().unwrap_or_default()
        } else {
            Locale::default()
        };
        Self {
            initial_locale,
            appearance: appearance.filter(|_| settings.follow_system_theme),
        }
    }
}

/// Owner of both preference stores for one application instance.
///
/// Views receive the store handles from here instead of looking them up
/// globally.
pub struct PreferenceContext {
    /// Backing storage shared by both stores.
    store: Arc<dyn KeyValueStore>,
    /// Shared background writer.
    persister: Persister,
    /// Language preference.
    language: Arc<LanguageStore>,
    /// Theme preference.
    theme: Arc<ThemeStore>,
    /// Platform appearance registration, released on unmount.
    appearance: Option<Subscription>,
}

impl std::fmt::Debug for PreferenceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceContext")
            .field("locale", &self.language.current_locale())
            .field("is_dark", &self.theme.is_dark())
            .field("follows_appearance", &self.appearance.is_some())
            .finish_non_exhaustive()
    }
}

impl PreferenceContext {
    /// What: Build both stores at their initial values.
    ///
    /// Details:
    /// - Nothing is read from storage yet, so the first render sees the
    ///   defaults; call [`PreferenceContext::load_persisted`] afterwards.
    /// - Starts the background writer, so a tokio runtime must be running.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, options: MountOptions) -> Self {
        let persister = Persister::spawn(Arc::clone(&store));
        let language = Arc::new(LanguageStore::new(persister.clone(), options.initial_locale));
        let theme = Arc::new(ThemeStore::new(persister.clone(), None));
        let appearance = options
            .appearance
            .as_deref()
            .map(|notifier| theme.follow_platform(notifier));
        tracing::debug!(
            locale = %options.initial_locale,
            follows_appearance = appearance.is_some(),
            "preference context created"
        );
        Self {
            store,
            persister,
            language,
            theme,
            appearance,
        }
    }

    /// Build the context and wait for persisted values to be applied.
    pub async fn mount(store: Arc<dyn KeyValueStore>, options: MountOptions) -> Self {
        let ctx = Self::new(store, options);
        ctx.load_persisted().await;
        ctx
    }

    /// Read both persisted preferences concurrently and apply them.
    pub async fn load_persisted(&self) {
        let store = self.store.as_ref();
        let (locale, is_dark) = futures::join!(
            self.language.load_persisted(store),
            self.theme.load_persisted(store)
        );
        tracing::info!(locale = %locale, is_dark, "preferences loaded");
    }

    /// Language store handle.
    #[must_use]
    pub const fn language(&self) -> &Arc<LanguageStore> {
        &self.language
    }

    /// Theme store handle.
    #[must_use]
    pub const fn theme(&self) -> &Arc<ThemeStore> {
        &self.theme
    }

    /// Backing storage.
    #[must_use]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Whether the theme store is registered with a platform notifier.
    #[must_use]
    pub const fn follows_appearance(&self) -> bool {
        self.appearance.is_some()
    }

    /// What: Tear down the context.
    ///
    /// Output:
    /// - `true` when every pending write finished before returning.
    ///
    /// Details:
    /// - Releases the platform appearance registration, then waits for the
    ///   writer to drain. Writes are never cancelled.
    pub async fn unmount(mut self) -> bool {
        if let Some(sub) = self.appearance.take() {
            sub.unsubscribe();
        }
        let drained = self.persister.flush().await;
        tracing::debug!(drained, "preference context unmounted");
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::AppearanceChannel;
    use crate::storage::{LANGUAGE_KEY, MemoryStore, THEME_KEY};
    use crate::theme::ColorScheme;

    #[tokio::test]
    /// What: Mounting over stored values restores both preferences.
    ///
    /// Inputs:
    /// - Backend holding "hi" and "dark".
    ///
    /// Output:
    /// - Hindi and dark active after `mount`.
    async fn mount_restores_both() {
        let backend = Arc::new(MemoryStore::with_entries([
            (LANGUAGE_KEY, "hi"),
            (THEME_KEY, "dark"),
        ]));
        let ctx = PreferenceContext::mount(backend, MountOptions::default()).await;
        assert_eq!(ctx.language().current_locale(), Locale::Hi);
        assert!(ctx.theme().is_dark());
        assert!(ctx.unmount().await);
    }

    #[tokio::test]
    /// What: Defaults are visible before loading completes.
    ///
    /// Output:
    /// - `new` exposes English/light; `load_persisted` then applies "hi".
    async fn first_render_sees_defaults() {
        let backend = Arc::new(MemoryStore::with_entries([(LANGUAGE_KEY, "hi")]));
        let ctx = PreferenceContext::new(backend, MountOptions::default());
        assert_eq!(ctx.language().current_locale(), Locale::En);
        assert!(!ctx.theme().is_dark());
        ctx.load_persisted().await;
        assert_eq!(ctx.language().current_locale(), Locale::Hi);
    }

    #[tokio::test]
    /// What: Unmount releases the appearance listener and drains writes.
    ///
    /// Inputs:
    /// - Context following a channel; one toggle before unmount.
    ///
    /// Output:
    /// - Listener count drops to zero; the toggle is in storage.
    async fn unmount_releases_and_flushes() {
        let backend = Arc::new(MemoryStore::new());
        let channel = Arc::new(AppearanceChannel::new(Some(ColorScheme::Light)));
        let options = MountOptions {
            initial_locale: Locale::En,
            appearance: Some(channel.clone()),
        };
        let ctx = PreferenceContext::mount(backend.clone(), options).await;
        assert!(ctx.follows_appearance());
        assert_eq!(channel.listener_count(), 1);
        let _ = ctx.theme().toggle_theme();
        assert!(ctx.unmount().await);
        assert_eq!(channel.listener_count(), 0);
        assert_eq!(backend.value(THEME_KEY), Some("dark".to_string()));
    }

    #[test]
    /// What: Settings gate appearance following.
    fn options_from_settings() {
        let channel: Arc<dyn AppearanceNotifier> = Arc::new(AppearanceChannel::new(None));
        let mut settings = Settings::default();
        assert!(MountOptions::from_settings(&settings, Some(channel.clone())).appearance.is_some());
        settings.follow_system_theme = false;
        let options = MountOptions::from_settings(&settings, Some(channel));
        assert!(options.appearance.is_none());
        assert_eq!(options.initial_locale, Locale::En);
    }
}
