use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Title given to every freshly created chat session.
pub const DEFAULT_SESSION_TITLE: &str = "新对话";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Uploaded,
    Processing,
    Indexed,
}

/// A document the user uploaded, mirrored from the upload response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: u64,
    pub upload_date: DateTime<Utc>,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl FileItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        file_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            file_type: file_type.into(),
            size,
            upload_date: Utc::now(),
            status: FileStatus::Uploaded,
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_status(mut self, status: FileStatus) -> Self {
        self.status = status;
        self
    }
}

/// Canonical search hit. Every backend encoding is normalized into this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub document: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub score: f64,
}

impl SearchResult {
    pub fn new(document: impl Into<String>, metadata: Map<String, Value>, score: f64) -> Self {
        Self {
            document: document.into(),
            metadata,
            score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    User,
    Assistant,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<SearchResult>>,
}

/// One entry of a chat transcript. Never modified after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageType::User, content, None)
    }

    pub fn assistant(content: impl Into<String>, metadata: MessageMetadata) -> Self {
        Self::new(MessageType::Assistant, content, Some(metadata))
    }

    fn new(
        message_type: MessageType,
        content: impl Into<String>,
        metadata: Option<MessageMetadata>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            message_type,
            content: content.into(),
            timestamp: Utc::now(),
            metadata,
        }
    }

    pub fn is_user(&self) -> bool {
        self.message_type == MessageType::User
    }

    pub fn is_assistant(&self) -> bool {
        self.message_type == MessageType::Assistant
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Question/answer pairs from the last `window` messages.
    ///
    /// A pair is a user message immediately followed by an assistant message;
    /// unanswered questions and orphan answers are skipped.
    pub fn recent_exchanges(&self, window: usize) -> Vec<(String, String)> {
        let start = self.messages.len().saturating_sub(window);
        self.messages[start..]
            .windows(2)
            .filter(|pair| pair[0].is_user() && pair[1].is_assistant())
            .map(|pair| (pair[0].content.clone(), pair[1].content.clone()))
            .collect()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with(messages: Vec<ChatMessage>) -> ChatSession {
        ChatSession {
            messages,
            ..ChatSession::new()
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let session = ChatSession::new();
        assert_eq!(session.title, DEFAULT_SESSION_TITLE);
        assert!(session.messages.is_empty());
        assert!(session.last_message().is_none());
    }

    #[test]
    fn test_recent_exchanges_pairs_adjacent_messages() {
        let session = session_with(vec![
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1", MessageMetadata::default()),
            ChatMessage::user("q2"),
            ChatMessage::user("q3"),
            ChatMessage::assistant("a3", MessageMetadata::default()),
        ]);

        let history = session.recent_exchanges(10);
        assert_eq!(
            history,
            vec![
                ("q1".to_string(), "a1".to_string()),
                ("q3".to_string(), "a3".to_string()),
            ]
        );
    }

    #[test]
    fn test_recent_exchanges_respects_window() {
        let mut messages = Vec::new();
        for i in 0..8 {
            messages.push(ChatMessage::user(format!("q{i}")));
            messages.push(ChatMessage::assistant(format!("a{i}"), MessageMetadata::default()));
        }
        let session = session_with(messages);

        let history = session.recent_exchanges(10);
        assert_eq!(history.len(), 5);
        assert_eq!(history[0], ("q3".to_string(), "a3".to_string()));
        assert_eq!(history[4], ("q7".to_string(), "a7".to_string()));
    }

    #[test]
    fn test_recent_exchanges_window_splitting_a_pair() {
        let session = session_with(vec![
            ChatMessage::user("q1"),
            ChatMessage::assistant("a1", MessageMetadata::default()),
            ChatMessage::user("q2"),
        ]);

        // The window starts on an answer, so its question is gone.
        assert!(session.recent_exchanges(2).is_empty());
    }

    #[test]
    fn test_message_serializes_type_field() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "user");
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_search_result_defaults_missing_fields() {
        let result: SearchResult = serde_json::from_str(r#"{"document":"doc"}"#).unwrap();
        assert!(result.metadata.is_empty());
        assert_eq!(result.score, 0.0);
    }
}
