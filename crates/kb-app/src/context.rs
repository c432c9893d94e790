use crate::config::Config;
use crate::controllers::{
    ChatController, DashboardController, FileController, SearchController, SettingsController,
};
use anyhow::{Context, Result};
use kb_client::Gateway;
use kb_store::{ErrorExpiry, Store};
use kb_types::{AppState, Preferences};
use std::sync::Arc;

/// Everything a front end needs: one store, one gateway reporting into it,
/// and the error auto-clear bound to the context's lifetime.
///
/// Must be created inside a Tokio runtime.
pub struct AppContext {
    pub config: Arc<Config>,
    pub store: Store,
    pub gateway: Gateway,
    _error_expiry: ErrorExpiry,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let state = AppState {
            preferences: Preferences {
                theme: config.ui.theme,
                language: config.ui.language,
                ..Preferences::default()
            },
            ..AppState::default()
        };
        let store = Store::with_state(state);

        let gateway = Gateway::from_config(&config.api, Some(Arc::new(store.clone())))
            .context("Failed to create request gateway")?;

        let error_expiry = ErrorExpiry::spawn(store.clone(), config.ui.error_ttl());

        tracing::debug!(base_url = gateway.base_url(), "application context ready");

        Ok(Self {
            config: Arc::new(config),
            store,
            gateway,
            _error_expiry: error_expiry,
        })
    }

    pub fn chat(&self) -> ChatController {
        ChatController::new(
            self.gateway.clone(),
            self.store.clone(),
            self.config.chat.clone(),
        )
    }

    pub fn files(&self) -> FileController {
        FileController::new(self.gateway.clone(), self.store.clone())
    }

    pub fn search(&self) -> SearchController {
        SearchController::new(
            self.gateway.clone(),
            self.store.clone(),
            self.config.search.clone(),
        )
    }

    pub fn dashboard(&self) -> DashboardController {
        DashboardController::new(self.gateway.clone(), self.store.clone())
    }

    pub fn settings(&self) -> SettingsController {
        SettingsController::new(self.gateway.clone(), self.store.clone())
    }
}
