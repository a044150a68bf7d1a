//! Platform appearance reporting.
//!
//! The theme store can follow the platform's light/dark appearance until the
//! user picks a theme. Hosts feed appearance changes through an
//! [`AppearanceNotifier`]; [`AppearanceChannel`] is the in-process
//! implementation and [`detect_terminal_scheme`] probes the terminal once.

mod terminal;

pub use terminal::{detect_terminal_scheme, scheme_from_colorfgbg};

use std::sync::{PoisonError, RwLock};

use crate::prefs::{Observers, Subscription};
use crate::theme::ColorScheme;

/// Listener invoked with the newly reported scheme.
pub type AppearanceListener = Box<dyn Fn(ColorScheme) + Send + Sync>;

/// Source of platform appearance changes.
pub trait AppearanceNotifier: Send + Sync {
    /// Scheme currently reported, or `None` when the platform has no opinion.
    fn current_scheme(&self) -> Option<ColorScheme>;

    /// What: Register `listener` for appearance changes.
    ///
    /// Output:
    /// - Guard that unregisters the listener when dropped.
    fn subscribe(&self, listener: AppearanceListener) -> Subscription;
}

/// In-process appearance notifier driven by [`AppearanceChannel::emit`].
#[derive(Debug, Default)]
pub struct AppearanceChannel {
    /// Last reported scheme.
    current: RwLock<Option<ColorScheme>>,
    /// Registered listeners.
    listeners: Observers<ColorScheme>,
}

impl AppearanceChannel {
    /// Create a channel reporting `initial`.
    #[must_use]
    pub fn new(initial: Option<ColorScheme>) -> Self {
        Self {
            current: RwLock::new(initial),
            listeners: Observers::new(),
        }
    }

    /// What: Report a platform appearance change.
    ///
    /// Details:
    /// - Listeners are called synchronously on the caller's thread, even if
    ///   the scheme did not change.
    pub fn emit(&self, scheme: ColorScheme) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(scheme);
        tracing::debug!(scheme = %scheme, listeners = self.listeners.len(), "platform appearance changed");
        self.listeners.notify(&scheme);
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl AppearanceNotifier for AppearanceChannel {
    fn current_scheme(&self) -> Option<ColorScheme> {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe(&self, listener: AppearanceListener) -> Subscription {
        self.listeners.subscribe(move |scheme| listener(*scheme))
    }
}
