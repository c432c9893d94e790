use crate::store::Store;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// How long a shared request error stays visible.
pub const DEFAULT_ERROR_TTL: Duration = Duration::from_secs(10);

/// Scoped auto-clear for `ApiStatus::error`.
///
/// Each error gets its own deadline, counted from when the error was set
/// rather than when the watcher noticed it. A newer error re-arms the
/// deadline, a dismissal disarms it, and an expired deadline only clears the
/// error it was armed for. Dropping the handle stops the watcher.
pub struct ErrorExpiry {
    task: JoinHandle<()>,
}

impl ErrorExpiry {
    pub fn spawn(store: Store, ttl: Duration) -> Self {
        let task = tokio::spawn(watch_errors(store, ttl));
        Self { task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    pub fn stop(self) {}
}

impl Drop for ErrorExpiry {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn watch_errors(store: Store, ttl: Duration) {
    let mut rx = store.subscribe();
    // (error_seq, deadline) of the error currently on display
    let mut armed: Option<(u64, Instant)> = None;

    loop {
        {
            let state = rx.borrow_and_update();
            let api = &state.api;
            armed = match (api.error.is_some(), armed) {
                (true, Some((seq, deadline))) if seq == api.error_seq => Some((seq, deadline)),
                (true, _) => {
                    let set_at = api
                        .error_set_at
                        .map(Instant::from_std)
                        .unwrap_or_else(Instant::now);
                    Some((api.error_seq, set_at + ttl))
                }
                (false, _) => None,
            };
        }

        match armed {
            Some((seq, deadline)) => {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = sleep_until(deadline) => {
                        if store.expire_api_error(seq) {
                            tracing::debug!(error_seq = seq, "shared request error expired");
                        }
                        armed = None;
                    }
                }
            }
            None => {
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_watcher_stops_on_drop() {
        let store = Store::new();
        let expiry = ErrorExpiry::spawn(store.clone(), DEFAULT_ERROR_TTL);
        tokio::task::yield_now().await;
        assert!(expiry.is_running());

        expiry.stop();
        store.set_api_error(Some("late".into()));
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(store.api_status().error.as_deref(), Some("late"));
    }
}
