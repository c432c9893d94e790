pub mod config;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod types;

pub use config::GatewayConfig;
pub use endpoints::{ChatApi, DocumentsApi, LocalModelApi, SearchApi, SystemApi};
pub use error::{RequestError, RequestResult};
pub use gateway::{Gateway, GatewayBuilder, RequestOptions, Tracking};
pub use types::{
    ApiEnvelope, ChatRequest, ChatResponse, CollectionInfo, DeleteRequest, DeleteResponse,
    DocumentInput, DocumentResponse, HealthResponse, LocalChatRequest, LocalChatResponse,
    ModelInfo, RawSearchResults, SearchRequest, SearchResponse, SearchResults,
};
