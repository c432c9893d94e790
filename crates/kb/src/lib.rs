//! # kb
//!
//! Client for a retrieval-augmented knowledge base backend: upload documents,
//! run semantic search and chat over them with a hosted or local model.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kb::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let ctx = AppContext::new(Config::load()?)?;
//!
//!     let chat = ctx.chat();
//!     chat.new_session();
//!     if let Some(answer) = chat.send("What is in my notes?").await? {
//!         println!("{}", answer.content);
//!     }
//!
//!     // Every tracked call reports into the shared status
//!     println!("{:?}", ctx.store.api_status());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`kb-types`**: plain data (files, sessions, messages, state, parameters)
//! - **`kb-client`**: the request gateway and typed endpoint groups
//! - **`kb-store`**: observable application state, error auto-clear, polling
//! - **`kb-app`**: controllers, configuration and the `kb` binary

pub mod prelude;

pub use kb_types::{
    ApiStatus, ApiStatusSink, AppState, ChatBackend, ChatMessage, ChatParams, ChatSession,
    FileItem, FileStatus, Language, MessageMetadata, MessageType, Preferences, SearchParams,
    SearchResult, Theme,
};

pub use kb_client::{
    ApiEnvelope, Gateway, GatewayBuilder, GatewayConfig, RequestError, RequestOptions,
    RequestResult, SearchResults, Tracking,
};

pub use kb_store::{spawn_polling, ErrorExpiry, PollHandle, Store};

pub use kb_app::controllers::{
    ChatController, DashboardController, DashboardSnapshot, FileController, SearchController,
    SettingsController, UploadFile,
};
pub use kb_app::{i18n, AppContext, Config};
