use super::ApiEnvelope;
use kb_types::SearchResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_results: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            n_results: None,
            min_score: None,
        }
    }

    pub fn with_n_results(mut self, n: u32) -> Self {
        self.n_results = Some(n);
        self
    }

    pub fn with_min_score(mut self, score: f64) -> Self {
        self.min_score = Some(score);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total_found: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiEnvelope for SearchResponse {
    fn succeeded(&self) -> bool {
        self.success
    }

    fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Columnar encoding: parallel arrays indexed by hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSearchResults {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub metadatas: Vec<Option<Map<String, Value>>>,
    #[serde(default)]
    pub scores: Vec<Option<f64>>,
}

impl RawSearchResults {
    /// Zip by index over `documents`. Missing metadata becomes `{}` and a
    /// missing score becomes `0`.
    pub fn into_rows(self) -> Vec<SearchResult> {
        let mut metadatas = self.metadatas.into_iter();
        let mut scores = self.scores.into_iter();

        self.documents
            .into_iter()
            .map(|document| {
                let metadata = metadatas.next().flatten().unwrap_or_default();
                let score = scores.next().flatten().unwrap_or(0.0);
                SearchResult::new(document, metadata, score)
            })
            .collect()
    }
}

/// Both encodings the chat backends use for `search_results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchResults {
    Rows(Vec<SearchResult>),
    Columnar(RawSearchResults),
}

impl SearchResults {
    pub fn normalize(self) -> Vec<SearchResult> {
        match self {
            SearchResults::Rows(rows) => rows,
            SearchResults::Columnar(raw) => raw.into_rows(),
        }
    }
}

impl From<SearchResults> for Vec<SearchResult> {
    fn from(results: SearchResults) -> Self {
        results.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_columnar_zip_with_missing_entries() {
        let raw: SearchResults = serde_json::from_value(json!({
            "documents": ["a", "b"],
            "metadatas": [{"f": 1}],
            "scores": [0.9]
        }))
        .unwrap();

        let rows = raw.normalize();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].document, "a");
        assert_eq!(rows[0].metadata.get("f"), Some(&json!(1)));
        assert_eq!(rows[0].score, 0.9);
        assert_eq!(rows[1].document, "b");
        assert!(rows[1].metadata.is_empty());
        assert_eq!(rows[1].score, 0.0);
    }

    #[test]
    fn test_columnar_null_entries_default() {
        let raw: SearchResults = serde_json::from_value(json!({
            "query": "q",
            "documents": ["a"],
            "metadatas": [null],
            "scores": [null]
        }))
        .unwrap();

        let rows = raw.normalize();
        assert!(rows[0].metadata.is_empty());
        assert_eq!(rows[0].score, 0.0);
    }

    #[test]
    fn test_columnar_without_documents_is_empty() {
        let raw: SearchResults = serde_json::from_value(json!({"query": "q"})).unwrap();
        assert!(raw.normalize().is_empty());
    }

    #[test]
    fn test_rows_pass_through() {
        let raw: SearchResults = serde_json::from_value(json!([
            {"document": "a", "metadata": {"source": "x.txt"}, "score": 0.5}
        ]))
        .unwrap();

        assert!(matches!(raw, SearchResults::Rows(_)));
        let rows = raw.normalize();
        assert_eq!(rows[0].metadata["source"], "x.txt");
    }

    #[test]
    fn test_search_request_skips_unset_fields() {
        let json = serde_json::to_value(SearchRequest::new("rust")).unwrap();
        assert_eq!(json, json!({"query": "rust"}));
    }

    #[test]
    fn test_failed_search_into_result() {
        let response: SearchResponse =
            serde_json::from_value(json!({"success": false, "error": "index empty"})).unwrap();
        let err = response.into_result("search failed").unwrap_err();
        assert_eq!(err.to_string(), "index empty");
    }
}
