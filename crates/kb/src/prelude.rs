//! Prelude module for convenient imports
//!
//! ```rust
//! use kb::prelude::*;
//! ```

pub use crate::{
    AppContext, AppState, ChatBackend, ChatMessage, ChatParams, ChatSession, Config, FileItem,
    Gateway, Language, RequestError, RequestResult, SearchParams, SearchResult, Store, Theme,
    UploadFile,
};
