use crate::i18n;
use kb_client::{Gateway, RequestResult};
use kb_store::Store;
use kb_types::{Language, Preferences};

#[derive(Clone)]
pub struct SettingsController {
    gateway: Gateway,
    store: Store,
}

impl SettingsController {
    pub fn new(gateway: Gateway, store: Store) -> Self {
        Self { gateway, store }
    }

    pub fn preferences(&self) -> Preferences {
        self.store.preferences()
    }

    pub fn toggle_theme(&self) -> Preferences {
        self.store.toggle_theme();
        self.preferences()
    }

    pub fn set_language(&self, language: Language) -> Preferences {
        self.store.set_language(language);
        self.preferences()
    }

    pub fn toggle_sidebar(&self) -> Preferences {
        self.store.toggle_sidebar();
        self.preferences()
    }

    /// UI string in the current language.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        i18n::translate(self.store.preferences().language, key)
    }

    /// Wipe the backend collection. Irreversible; callers confirm first.
    pub async fn reset_knowledge_base(&self) -> RequestResult<String> {
        let message = self.gateway.system().reset().await?;
        tracing::warn!(%message, "knowledge base reset");
        Ok(message)
    }
}
