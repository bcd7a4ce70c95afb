use crate::config::ChatConfig;
use crate::models::{ChatReply, ChatRole, ChatTurn, Language};
use crate::services::error::GenerationError;
use crate::services::llm::{CompletionRequest, LanguageModel, Message};
use crate::services::prompts;
use crate::utils::text;
use std::sync::Arc;

/// Answers follow-up questions about a book, one question per call.
pub struct ChatResponder {
    model: Arc<dyn LanguageModel>,
    config: ChatConfig,
}

impl ChatResponder {
    pub fn new(model: Arc<dyn LanguageModel>, config: ChatConfig) -> Self {
        Self { model, config }
    }

    /// Messages for one call: instruction, book context, recent turns, question.
    pub fn assemble(
        &self,
        content: &str,
        question: &str,
        language: Language,
        history: &[ChatTurn],
    ) -> Vec<Message> {
        let book_text = text::window(
            content,
            self.config.budget.max_chars(),
            self.config.context_window_chars,
        );
        let recent = &history[history.len().saturating_sub(self.config.history_turns)..];

        let mut messages = Vec::with_capacity(recent.len() + 3);
        messages.push(Message::system(prompts::chat_instruction(language)));
        messages.push(Message::system(format!("Book content: {book_text}")));
        messages.extend(recent.iter().map(|turn| match turn.role {
            ChatRole::User => Message::user(turn.content.as_str()),
            ChatRole::Assistant => Message::assistant(turn.content.as_str()),
        }));
        messages.push(Message::user(question));
        messages
    }

    pub async fn answer(
        &self,
        content: &str,
        question: &str,
        language: &str,
        history: &[ChatTurn],
    ) -> Result<ChatReply, GenerationError> {
        let selection = prompts::resolve_language(language);
        let request = CompletionRequest {
            messages: self.assemble(content, question, selection.language, history),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tracing::debug!(
            language = %selection.language,
            history = history.len(),
            "answering chat question"
        );

        let answer = self.model.complete(request).await.map_err(|e| {
            tracing::warn!(error = %e, "chat answer failed");
            GenerationError::Chat(e)
        })?;

        Ok(ChatReply {
            answer,
            language: selection.language,
            language_fallback: selection.fell_back,
        })
    }
}
