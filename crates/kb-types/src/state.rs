use crate::models::{ChatMessage, ChatSession, FileItem, SearchResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "zh-CN")]
    ZhCn,
    #[serde(rename = "en")]
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::ZhCn => "zh-CN",
            Language::En => "en",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "zh-CN" => Some(Language::ZhCn),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub theme: Theme,
    pub language: Language,
    pub sidebar_collapsed: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            language: Language::ZhCn,
            sidebar_collapsed: false,
        }
    }
}

/// Shared status of tracked requests.
///
/// `error_seq` is bumped every time an error is set, so a timer armed for one
/// error can tell whether the error it sees is still the same one.
/// `error_set_at` lets that timer count from the moment the error was set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiStatus {
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_seq: u64,
    #[serde(skip)]
    pub error_set_at: Option<Instant>,
}

/// The whole client state. Only `kb-store` mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub files: Vec<FileItem>,
    pub upload_progress: f32,
    pub is_uploading: bool,

    pub current_session: Option<ChatSession>,
    pub chat_sessions: Vec<ChatSession>,
    pub is_typing: bool,

    pub search_query: String,
    pub search_results: Vec<SearchResult>,
    pub is_searching: bool,

    pub api: ApiStatus,
    pub preferences: Preferences,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, file: FileItem) {
        self.files.push(file);
    }

    pub fn remove_file(&mut self, file_id: &str) {
        self.files.retain(|f| f.id != file_id);
    }

    pub fn find_file(&self, file_id: &str) -> Option<&FileItem> {
        self.files.iter().find(|f| f.id == file_id)
    }

    /// Prepend `session` and make it current.
    pub fn open_session(&mut self, session: ChatSession) {
        self.chat_sessions.insert(0, session.clone());
        self.current_session = Some(session);
    }

    /// Append to the matching session and to the current-session mirror.
    /// Unknown ids leave the state untouched.
    pub fn add_message(&mut self, session_id: &str, message: ChatMessage) {
        for session in self.chat_sessions.iter_mut().filter(|s| s.id == session_id) {
            session.messages.push(message.clone());
        }

        if let Some(current) = self.current_session.as_mut() {
            if current.id == session_id {
                current.messages.push(message);
            }
        }
    }

    pub fn find_session(&self, session_id: &str) -> Option<&ChatSession> {
        self.chat_sessions.iter().find(|s| s.id == session_id)
    }

    pub fn set_api_error(&mut self, error: Option<String>) {
        self.set_api_error_at(error, Instant::now());
    }

    /// Set the error as of `at`; `None` behaves like [`AppState::clear_api_error`].
    pub fn set_api_error_at(&mut self, error: Option<String>, at: Instant) {
        if error.is_some() {
            self.api.error_seq += 1;
            self.api.error_set_at = Some(at);
        } else {
            self.api.error_set_at = None;
        }
        self.api.error = error;
    }

    pub fn clear_api_error(&mut self) {
        self.api.error = None;
        self.api.error_set_at = None;
    }

    pub fn toggle_theme(&mut self) {
        self.preferences.theme = self.preferences.theme.toggled();
    }

    pub fn toggle_sidebar(&mut self) {
        self.preferences.sidebar_collapsed = !self.preferences.sidebar_collapsed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageMetadata;

    #[test]
    fn test_defaults() {
        let state = AppState::new();
        assert_eq!(state.preferences.theme, Theme::Dark);
        assert_eq!(state.preferences.language, Language::ZhCn);
        assert!(!state.preferences.sidebar_collapsed);
        assert!(!state.api.is_loading);
        assert!(state.api.error.is_none());
        assert!(state.current_session.is_none());
    }

    #[test]
    fn test_add_message_to_background_session() {
        let mut state = AppState::new();
        let first = ChatSession::new();
        let first_id = first.id.clone();
        state.open_session(first);
        state.open_session(ChatSession::new());

        state.add_message(&first_id, ChatMessage::user("hi"));

        assert_eq!(state.find_session(&first_id).unwrap().messages.len(), 1);
        assert!(state.current_session.as_ref().unwrap().messages.is_empty());
    }

    #[test]
    fn test_add_message_to_mirror_only_when_ids_match() {
        let mut state = AppState::new();
        let session = ChatSession::new();
        let id = session.id.clone();
        state.open_session(session);

        state.add_message(&id, ChatMessage::assistant("ok", MessageMetadata::default()));

        assert_eq!(
            state.current_session.as_ref().unwrap(),
            state.find_session(&id).unwrap()
        );
    }

    #[test]
    fn test_error_seq_only_bumps_on_set() {
        let mut state = AppState::new();
        state.set_api_error(Some("boom".into()));
        assert!(state.api.error_set_at.is_some());
        state.clear_api_error();
        assert!(state.api.error_set_at.is_none());
        state.set_api_error(None);
        assert_eq!(state.api.error_seq, 1);
        assert!(state.api.error.is_none());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_code("en"), Some(Language::En));
        assert_eq!(Language::from_code(Language::ZhCn.code()), Some(Language::ZhCn));
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(serde_json::to_string(&Language::ZhCn).unwrap(), "\"zh-CN\"");
    }
}
