use serde::{Deserialize, Serialize};

/// Which model answers chat questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatBackend {
    /// Hosted LLM API (`/chat/ask`)
    Hosted,
    /// Locally served model (`/qwen/*`)
    #[default]
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatParams {
    pub backend: ChatBackend,
    pub use_search: bool,
    pub n_results: u32,
    pub min_score: f64,
    /// Sent as `max_tokens` to the hosted backend and `max_new_tokens` to the local one.
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
    /// How many trailing messages are mined for local-model history.
    pub history_window: usize,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            backend: ChatBackend::default(),
            use_search: true,
            n_results: 3,
            min_score: 0.3,
            max_tokens: 500,
            temperature: 0.7,
            top_p: 0.9,
            repetition_penalty: 1.1,
            history_window: 10,
        }
    }
}

impl ChatParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: ChatBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_search(mut self, use_search: bool) -> Self {
        self.use_search = use_search;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub n_results: u32,
    pub min_score: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            n_results: 5,
            min_score: 0.3,
        }
    }
}

impl SearchParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_n_results(mut self, n: u32) -> Self {
        self.n_results = n;
        self
    }

    pub fn with_min_score(mut self, score: f64) -> Self {
        self.min_score = score;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults_to_local() {
        assert_eq!(ChatBackend::default(), ChatBackend::Local);
        assert_eq!(ChatParams::default().backend, ChatBackend::Local);

        let params: ChatParams = serde_json::from_str(r#"{"backend":"hosted"}"#).unwrap();
        assert_eq!(params.backend, ChatBackend::Hosted);
        assert_eq!(params.n_results, 3);
    }
}
