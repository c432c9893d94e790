//! Headless counterparts of the client's views.
//!
//! Each controller performs one view's user actions against the gateway and
//! writes the resolved values into the store. Failures come back as
//! [`kb_client::RequestError`] for the caller to display.

mod chat;
mod dashboard;
mod files;
mod search;
mod settings;

pub use chat::ChatController;
pub use dashboard::{DashboardController, DashboardSnapshot};
pub use files::{guess_mime_type, FileController, UploadFile};
pub use search::SearchController;
pub use settings::SettingsController;

use kb_store::Store;

/// Holds a store flag up until dropped, so the flag is lowered on success,
/// failure and when the action's future is dropped mid-flight.
struct BusyFlag {
    store: Store,
    set: fn(&Store, bool),
}

impl BusyFlag {
    fn raise(store: &Store, set: fn(&Store, bool)) -> Self {
        set(store, true);
        Self {
            store: store.clone(),
            set,
        }
    }
}

impl Drop for BusyFlag {
    fn drop(&mut self) {
        (self.set)(&self.store, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_flag_lowers_on_drop() {
        let store = Store::new();
        let typing = BusyFlag::raise(&store, Store::set_is_typing);
        assert!(store.read(|s| s.is_typing));
        drop(typing);
        assert!(!store.read(|s| s.is_typing));
    }
}
