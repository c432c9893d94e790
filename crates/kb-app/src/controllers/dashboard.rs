use chrono::{DateTime, Utc};
use kb_client::{CollectionInfo, Gateway, HealthResponse, ModelInfo, RequestResult};
use kb_store::{spawn_polling, PollHandle, Store};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub health: Option<HealthResponse>,
    pub collection: Option<CollectionInfo>,
    pub model: Option<ModelInfo>,
    /// Collection count when the backend reported one, local file count otherwise.
    pub document_count: u64,
    pub session_count: usize,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct DashboardController {
    gateway: Gateway,
    store: Store,
}

impl DashboardController {
    pub fn new(gateway: Gateway, store: Store) -> Self {
        Self { gateway, store }
    }

    /// Fetch health, collection info and model info concurrently.
    ///
    /// Each call may fail on its own; a failed call leaves its slot empty.
    pub async fn refresh(&self) -> DashboardSnapshot {
        let system = self.gateway.system();
        let local = self.gateway.local_model();

        let (health, collection, model) =
            futures::join!(system.health(), system.info(), local.model_info());

        let health = settled("health", health);
        let collection = settled("collection info", collection);
        let model = settled("model info", model);

        let (file_count, session_count) =
            self.store.read(|s| (s.files.len() as u64, s.chat_sessions.len()));

        DashboardSnapshot {
            document_count: collection
                .as_ref()
                .map(|c| c.document_count)
                .unwrap_or(file_count),
            health,
            collection,
            model,
            session_count,
            refreshed_at: Utc::now(),
        }
    }

    /// Refresh now and then every `period` until the handle is dropped.
    /// The latest snapshot is published on the returned receiver.
    pub fn start_polling(
        &self,
        period: Duration,
    ) -> (PollHandle, watch::Receiver<Option<DashboardSnapshot>>) {
        let (tx, rx) = watch::channel(None);
        let tx = Arc::new(tx);
        let dashboard = self.clone();

        let handle = spawn_polling(period, move || {
            let dashboard = dashboard.clone();
            let tx = tx.clone();
            async move {
                let snapshot = dashboard.refresh().await;
                tx.send_replace(Some(snapshot));
            }
        });

        (handle, rx)
    }
}

fn settled<T>(what: &str, result: RequestResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "dashboard {} unavailable", what);
            None
        }
    }
}
