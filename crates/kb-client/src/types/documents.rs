use super::ApiEnvelope;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<Vec<Map<String, Value>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub document_ids: Vec<String>,
    #[serde(default)]
    pub count: u64,
}

impl ApiEnvelope for DocumentResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub document_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub deleted_count: u64,
}

impl ApiEnvelope for DeleteResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}
