use super::{ApiEnvelope, SearchResults};
use kb_types::{ChatParams, SearchResult};
use serde::{Deserialize, Serialize};

/// Hosted-model question (`/chat/ask`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            use_search: None,
            n_results: None,
            min_score: None,
            max_tokens: None,
        }
    }

    pub fn from_params(question: impl Into<String>, params: &ChatParams) -> Self {
        Self {
            question: question.into(),
            use_search: Some(params.use_search),
            n_results: Some(params.n_results),
            min_score: Some(params.min_score),
            max_tokens: Some(params.max_tokens),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<SearchResults>,
    #[serde(default)]
    pub context_used: u32,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn normalized_search_results(&self) -> Option<Vec<SearchResult>> {
        self.search_results.clone().map(SearchResults::normalize)
    }
}

impl ApiEnvelope for ChatResponse {
    fn succeeded(&self) -> bool {
        self.success && !self.answer.is_empty()
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Local-model question (`/qwen/chat`, `/qwen/chat-with-search`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalChatRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<(String, String)>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_search: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
}

impl LocalChatRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            history: None,
            use_search: None,
            n_results: None,
            min_score: None,
            max_new_tokens: None,
            temperature: None,
            top_p: None,
            repetition_penalty: None,
        }
    }

    pub fn from_params(
        question: impl Into<String>,
        history: Vec<(String, String)>,
        params: &ChatParams,
    ) -> Self {
        Self {
            question: question.into(),
            history: Some(history),
            use_search: Some(params.use_search),
            n_results: Some(params.n_results),
            min_score: Some(params.min_score),
            max_new_tokens: Some(params.max_tokens),
            temperature: Some(params.temperature),
            top_p: Some(params.top_p),
            repetition_penalty: Some(params.repetition_penalty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalChatResponse {
    pub success: bool,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<SearchResults>,
    #[serde(default)]
    pub context_used: u32,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub history_length: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocalChatResponse {
    pub fn normalized_search_results(&self) -> Option<Vec<SearchResult>> {
        self.search_results.clone().map(SearchResults::normalize)
    }
}

impl ApiEnvelope for LocalChatResponse {
    fn succeeded(&self) -> bool {
        self.success && !self.answer.is_empty()
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_history_serializes_as_pairs() {
        let request = LocalChatRequest::from_params(
            "next?",
            vec![("q".into(), "a".into())],
            &ChatParams::default(),
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["history"], json!([["q", "a"]]));
        assert_eq!(json["max_new_tokens"], 500);
        assert!(json.get("max_tokens").is_none());
    }

    #[test]
    fn test_local_response_with_columnar_results() {
        let response: LocalChatResponse = serde_json::from_value(json!({
            "success": true,
            "question": "q",
            "answer": "a",
            "search_results": {"query": "q", "documents": ["d"], "metadatas": [], "scores": [0.4]},
            "context_used": 1,
            "model": "qwen",
            "history_length": 0
        }))
        .unwrap();

        let rows = response.normalized_search_results().unwrap();
        assert_eq!(rows[0].document, "d");
        assert_eq!(rows[0].score, 0.4);
    }

    #[test]
    fn test_hosted_response_without_results() {
        let response: ChatResponse = serde_json::from_value(json!({
            "success": true,
            "question": "q",
            "answer": "a",
            "context_used": 0,
            "model": "gpt"
        }))
        .unwrap();
        assert!(response.normalized_search_results().is_none());
    }

    #[test]
    fn test_empty_answer_is_failure() {
        let response: ChatResponse =
            serde_json::from_value(json!({"success": true, "answer": ""})).unwrap();
        let err = response.into_result("chat request failed").unwrap_err();
        assert_eq!(err.to_string(), "chat request failed");
    }
}
