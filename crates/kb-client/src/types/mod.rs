mod chat;
mod documents;
mod search;
mod system;

pub use chat::{ChatRequest, ChatResponse, LocalChatRequest, LocalChatResponse};
pub use documents::{DeleteRequest, DeleteResponse, DocumentInput, DocumentResponse};
pub use search::{RawSearchResults, SearchRequest, SearchResponse, SearchResults};
pub use system::{CollectionInfo, HealthResponse, ModelInfo};

use crate::error::RequestError;

/// Responses that carry a `success` flag and an optional `error` string.
///
/// A body can decode fine and still report failure; this turns that case into
/// [`RequestError::Application`].
pub trait ApiEnvelope: Sized {
    fn succeeded(&self) -> bool;

    fn error_message(&self) -> Option<&str> {
        None
    }

    fn into_result(self, fallback: &str) -> Result<Self, RequestError> {
        if self.succeeded() {
            return Ok(self);
        }
        let message = self
            .error_message()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
            .to_string();
        Err(RequestError::Application(message))
    }
}
