use chrono::{DateTime, Utc};
use kb_types::{
    ApiStatus, ApiStatusSink, AppState, ChatMessage, ChatSession, FileItem, Language,
    Preferences, SearchResult,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Injectable state container.
///
/// Every action is one atomic update of the underlying [`AppState`]; after it
/// completes, subscribers are notified with the new snapshot. Clones share the
/// same state.
#[derive(Clone)]
pub struct Store {
    tx: Arc<watch::Sender<AppState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("state", &*self.tx.borrow()).finish()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_state(AppState::new())
    }

    pub fn with_state(state: AppState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> AppState {
        self.tx.borrow().clone()
    }

    /// Read without cloning the whole state.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.tx.subscribe()
    }

    pub fn api_status(&self) -> ApiStatus {
        self.read(|s| s.api.clone())
    }

    pub fn preferences(&self) -> Preferences {
        self.read(|s| s.preferences.clone())
    }

    // Files

    pub fn add_file(&self, file: FileItem) {
        self.tx.send_modify(|s| s.add_file(file));
    }

    pub fn remove_file(&self, file_id: &str) {
        self.tx.send_if_modified(|s| {
            let before = s.files.len();
            s.remove_file(file_id);
            s.files.len() != before
        });
    }

    pub fn set_upload_progress(&self, progress: f32) {
        self.tx
            .send_modify(|s| s.upload_progress = progress.clamp(0.0, 100.0));
    }

    pub fn set_is_uploading(&self, uploading: bool) {
        self.tx.send_modify(|s| s.is_uploading = uploading);
    }

    // Chat

    /// New empty session, prepended and made current in the same update.
    pub fn create_chat_session(&self) -> ChatSession {
        let session = ChatSession::new();
        tracing::debug!(session_id = %session.id, "created chat session");
        self.tx.send_modify(|s| s.open_session(session.clone()));
        session
    }

    pub fn set_current_session(&self, session: Option<ChatSession>) {
        self.tx.send_modify(|s| s.current_session = session);
    }

    /// Append to the session list entry and the current-session mirror
    /// together. Unknown ids are a no-op.
    pub fn add_message(&self, session_id: &str, message: ChatMessage) {
        let applied = self.tx.send_if_modified(|s| {
            let known = s.find_session(session_id).is_some()
                || s.current_session.as_ref().is_some_and(|c| c.id == session_id);
            if known {
                s.add_message(session_id, message);
            }
            known
        });
        if !applied {
            tracing::debug!(session_id, "ignored message for unknown session");
        }
    }

    pub fn set_is_typing(&self, typing: bool) {
        self.tx.send_modify(|s| s.is_typing = typing);
    }

    // Search

    pub fn set_search_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.tx.send_modify(|s| s.search_query = query);
    }

    pub fn set_search_results(&self, results: Vec<SearchResult>) {
        self.tx.send_modify(|s| s.search_results = results);
    }

    pub fn set_is_searching(&self, searching: bool) {
        self.tx.send_modify(|s| s.is_searching = searching);
    }

    // Shared request status

    pub fn set_api_loading(&self, loading: bool) {
        self.tx.send_modify(|s| s.api.is_loading = loading);
    }

    /// Stamped with the runtime clock so the expiry deadline follows paused
    /// time in tests.
    pub fn set_api_error(&self, error: Option<String>) {
        let at = tokio::time::Instant::now().into_std();
        self.tx.send_modify(|s| s.set_api_error_at(error, at));
    }

    pub fn set_api_last_updated(&self, at: Option<DateTime<Utc>>) {
        self.tx.send_modify(|s| s.api.last_updated = at);
    }

    pub fn clear_api_error(&self) {
        self.tx.send_if_modified(|s| {
            let had_error = s.api.error.is_some();
            s.clear_api_error();
            had_error
        });
    }

    /// Clear the error only if it is still the one identified by `error_seq`.
    pub(crate) fn expire_api_error(&self, error_seq: u64) -> bool {
        self.tx.send_if_modified(|s| {
            if s.api.error.is_some() && s.api.error_seq == error_seq {
                s.clear_api_error();
                true
            } else {
                false
            }
        })
    }

    // Preferences

    pub fn toggle_theme(&self) {
        self.tx.send_modify(|s| s.toggle_theme());
    }

    pub fn set_language(&self, language: Language) {
        self.tx.send_modify(|s| s.preferences.language = language);
    }

    pub fn toggle_sidebar(&self) {
        self.tx.send_modify(|s| s.toggle_sidebar());
    }
}

impl ApiStatusSink for Store {
    fn set_api_loading(&self, loading: bool) {
        Store::set_api_loading(self, loading);
    }

    fn set_api_error(&self, error: Option<String>) {
        Store::set_api_error(self, error);
    }

    fn set_api_last_updated(&self, at: Option<DateTime<Utc>>) {
        Store::set_api_last_updated(self, at);
    }

    fn clear_api_error(&self) {
        Store::clear_api_error(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_types::Theme;

    #[test]
    fn test_clones_share_state() {
        let store = Store::new();
        let other = store.clone();
        other.toggle_sidebar();
        assert!(store.preferences().sidebar_collapsed);
    }

    #[test]
    fn test_upload_progress_clamped() {
        let store = Store::new();
        store.set_upload_progress(150.0);
        assert_eq!(store.snapshot().upload_progress, 100.0);
    }

    #[test]
    fn test_set_language_leaves_other_preferences() {
        let store = Store::new();
        store.set_language(Language::En);
        let prefs = store.preferences();
        assert_eq!(prefs.language, Language::En);
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(!prefs.sidebar_collapsed);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let store = Store::new();
        let mut rx = store.subscribe();

        store.set_search_query("vector db");

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().search_query, "vector db");
    }

    #[tokio::test]
    async fn test_no_op_actions_do_not_notify() {
        let store = Store::new();
        let mut rx = store.subscribe();

        store.add_message("missing", ChatMessage::user("hi"));
        store.remove_file("missing");
        store.clear_api_error();

        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_expire_ignores_newer_error() {
        let store = Store::new();
        store.set_api_error(Some("first".into()));
        let first_seq = store.api_status().error_seq;
        store.set_api_error(Some("second".into()));

        assert!(!store.expire_api_error(first_seq));
        assert_eq!(store.api_status().error.as_deref(), Some("second"));
    }
}
