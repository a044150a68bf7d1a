//! Preference stores.
//!
//! [`LanguageStore`] and [`ThemeStore`] each own one preference for the
//! process lifetime. Consumers read through shared handles, request changes
//! through the stores' setters, and observe changes via [`Subscription`]
//! guards. Writes go through a shared background [`Persister`].

mod language;
mod observer;
pub mod persist;
mod theme;

pub use language::LanguageStore;
pub use observer::{Observers, Subscription};
pub use persist::{Persister, WriteTicket};
pub use theme::ThemeStore;
