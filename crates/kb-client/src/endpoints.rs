// Typed endpoint groups. Every call goes through `Gateway::request`.

use crate::error::RequestResult;
use crate::gateway::{Gateway, RequestOptions};
use crate::types::{
    ChatRequest, ChatResponse, CollectionInfo, DeleteRequest, DeleteResponse, DocumentInput,
    DocumentResponse, HealthResponse, LocalChatRequest, LocalChatResponse, ModelInfo,
    SearchRequest, SearchResponse,
};

impl Gateway {
    pub fn system(&self) -> SystemApi<'_> {
        SystemApi { gateway: self }
    }

    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi { gateway: self }
    }

    pub fn search(&self) -> SearchApi<'_> {
        SearchApi { gateway: self }
    }

    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi { gateway: self }
    }

    pub fn local_model(&self) -> LocalModelApi<'_> {
        LocalModelApi { gateway: self }
    }
}

/// `/system/*` and `/ping`
#[derive(Clone, Copy)]
pub struct SystemApi<'a> {
    gateway: &'a Gateway,
}

impl SystemApi<'_> {
    pub async fn health(&self) -> RequestResult<HealthResponse> {
        self.gateway
            .request("/system/health", RequestOptions::get())
            .await
    }

    pub async fn info(&self) -> RequestResult<CollectionInfo> {
        self.gateway
            .request("/system/info", RequestOptions::get())
            .await
    }

    /// Drops every document in the collection.
    pub async fn reset(&self) -> RequestResult<String> {
        self.gateway
            .request("/system/reset", RequestOptions::post())
            .await
    }

    pub async fn ping(&self) -> RequestResult<String> {
        self.gateway.request("/ping", RequestOptions::get()).await
    }
}

#[derive(Clone, Copy)]
pub struct DocumentsApi<'a> {
    gateway: &'a Gateway,
}

impl DocumentsApi<'_> {
    pub async fn upload(&self, input: &DocumentInput) -> RequestResult<DocumentResponse> {
        self.gateway
            .request("/documents/upload", RequestOptions::post().json(input)?)
            .await
    }

    pub async fn delete(&self, request: &DeleteRequest) -> RequestResult<DeleteResponse> {
        self.gateway
            .request("/documents/delete", RequestOptions::delete().json(request)?)
            .await
    }
}

#[derive(Clone, Copy)]
pub struct SearchApi<'a> {
    gateway: &'a Gateway,
}

impl SearchApi<'_> {
    pub async fn semantic(&self, request: &SearchRequest) -> RequestResult<SearchResponse> {
        self.gateway
            .request("/search/semantic", RequestOptions::post().json(request)?)
            .await
    }
}

/// Hosted LLM backend.
#[derive(Clone, Copy)]
pub struct ChatApi<'a> {
    gateway: &'a Gateway,
}

impl ChatApi<'_> {
    pub async fn ask(&self, request: &ChatRequest) -> RequestResult<ChatResponse> {
        self.gateway
            .request("/chat/ask", RequestOptions::post().json(request)?)
            .await
    }
}

/// Locally served model backend.
#[derive(Clone, Copy)]
pub struct LocalModelApi<'a> {
    gateway: &'a Gateway,
}

impl LocalModelApi<'_> {
    pub async fn chat(&self, request: &LocalChatRequest) -> RequestResult<LocalChatResponse> {
        self.gateway
            .request("/qwen/chat", RequestOptions::post().json(request)?)
            .await
    }

    pub async fn chat_with_search(
        &self,
        request: &LocalChatRequest,
    ) -> RequestResult<LocalChatResponse> {
        self.gateway
            .request("/qwen/chat-with-search", RequestOptions::post().json(request)?)
            .await
    }

    pub async fn model_info(&self) -> RequestResult<ModelInfo> {
        self.gateway
            .request("/qwen/model-info", RequestOptions::get())
            .await
    }
}
