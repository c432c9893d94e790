//! Core entities for the knowledge base client.
//!
//! Everything here is plain data: the state container that mutates these
//! values lives in `kb-store`, and the HTTP layer in `kb-client`.

pub mod config;
pub mod models;
pub mod state;
pub mod status;

pub use config::{ChatBackend, ChatParams, SearchParams};
pub use models::{
    ChatMessage, ChatSession, FileItem, FileStatus, MessageMetadata, MessageType, SearchResult,
    DEFAULT_SESSION_TITLE,
};
pub use state::{ApiStatus, AppState, Language, Preferences, Theme};
pub use status::ApiStatusSink;
