use super::BusyFlag;
use kb_client::{ApiEnvelope, ChatRequest, Gateway, LocalChatRequest, RequestResult};
use kb_store::Store;
use kb_types::{ChatBackend, ChatMessage, ChatParams, MessageMetadata};

const CHAT_FAILED: &str = "chat request failed";

#[derive(Clone)]
pub struct ChatController {
    gateway: Gateway,
    store: Store,
    params: ChatParams,
}

impl ChatController {
    pub fn new(gateway: Gateway, store: Store, params: ChatParams) -> Self {
        Self {
            gateway,
            store,
            params,
        }
    }

    pub fn params(&self) -> &ChatParams {
        &self.params
    }

    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    /// Start a new conversation and make it current.
    pub fn new_session(&self) -> String {
        self.store.create_chat_session().id
    }

    /// Ask `question` in the current session.
    ///
    /// Returns `Ok(None)` without contacting the backend when the question is
    /// blank, there is no current session, or an answer is still pending.
    /// The user message is appended before the call and stays in the
    /// transcript even if the call fails.
    pub async fn send(&self, question: &str) -> RequestResult<Option<ChatMessage>> {
        if question.trim().is_empty() {
            return Ok(None);
        }
        let Some(session) = self
            .store
            .read(|s| (!s.is_typing).then(|| s.current_session.clone()).flatten())
        else {
            return Ok(None);
        };

        // History is taken before the new question lands in the transcript
        let history = session.recent_exchanges(self.params.history_window);
        self.store.add_message(&session.id, ChatMessage::user(question));

        let answer = {
            let _typing = BusyFlag::raise(&self.store, Store::set_is_typing);
            self.ask(question, history).await
        };

        let answer = answer.inspect_err(|e| {
            tracing::warn!(session_id = %session.id, error = %e, "chat request failed");
        })?;
        self.store.add_message(&session.id, answer.clone());
        Ok(Some(answer))
    }

    async fn ask(
        &self,
        question: &str,
        history: Vec<(String, String)>,
    ) -> RequestResult<ChatMessage> {
        match self.params.backend {
            ChatBackend::Hosted => {
                let request = ChatRequest::from_params(question, &self.params);
                let response = self
                    .gateway
                    .chat()
                    .ask(&request)
                    .await?
                    .into_result(CHAT_FAILED)?;

                let metadata = MessageMetadata {
                    model: Some(response.model.clone()),
                    context_used: Some(response.context_used),
                    search_results: response.normalized_search_results(),
                };
                Ok(ChatMessage::assistant(response.answer, metadata))
            }
            ChatBackend::Local => {
                let request = LocalChatRequest::from_params(question, history, &self.params);
                let local = self.gateway.local_model();
                let response = if self.params.use_search {
                    local.chat_with_search(&request).await?
                } else {
                    local.chat(&request).await?
                };
                let response = response.into_result(CHAT_FAILED)?;

                let metadata = MessageMetadata {
                    model: Some(response.model.clone()),
                    context_used: Some(response.context_used),
                    search_results: response.normalized_search_results(),
                };
                Ok(ChatMessage::assistant(response.answer, metadata))
            }
        }
    }
}
