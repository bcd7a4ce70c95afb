mod common;

use bookguide::config::ChatConfig;
use bookguide::models::{ChatTurn, Language};
use bookguide::services::llm::{LLMError, Message, MessageRole};
use bookguide::services::{ChatResponder, GenerationError, prompts};
use bookguide::utils::text::TRUNCATION_MARKER;
use common::RecordingModel;
use std::sync::Arc;

fn seven_turns() -> Vec<ChatTurn> {
    (0..7)
        .map(|i| {
            if i % 2 == 0 {
                ChatTurn::user(format!("question {i}"))
            } else {
                ChatTurn::assistant(format!("answer {i}"))
            }
        })
        .collect()
}

#[tokio::test]
async fn scenario_c_only_last_five_turns_are_sent() {
    let model = Arc::new(RecordingModel::answering("Identity-based habits."));
    let responder = ChatResponder::new(model.clone(), ChatConfig::default());
    let history = seven_turns();

    let reply = responder
        .answer("Book text", "What is the main theme?", "en", &history)
        .await
        .unwrap();
    assert_eq!(reply.answer, "Identity-based habits.");

    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    let messages = &requests[0].messages;

    // instruction, book context, five turns, question
    assert_eq!(messages.len(), 8);
    assert_eq!(messages[0], Message::system(prompts::chat_instruction(Language::En)));
    assert_eq!(messages[1], Message::system("Book content: Book text"));

    let sent_turns: Vec<&str> = messages[2..7].iter().map(|m| m.content.as_str()).collect();
    let expected: Vec<&str> = history[2..].iter().map(|t| t.content.as_str()).collect();
    assert_eq!(sent_turns, expected);
    assert!(!messages.iter().any(|m| m.content == "question 0" || m.content == "answer 1"));

    assert_eq!(messages[2].role, MessageRole::User);
    assert_eq!(messages[3].role, MessageRole::Assistant);
    assert_eq!(messages[7], Message::user("What is the main theme?"));
    assert_eq!(requests[0].max_tokens, 1_000);
    assert_eq!(requests[0].temperature, 0.7);
}

#[tokio::test]
async fn unsupported_language_chats_like_english() {
    let english = Arc::new(RecordingModel::answering("a"));
    let other = Arc::new(RecordingModel::answering("a"));
    let history = seven_turns();

    ChatResponder::new(english.clone(), ChatConfig::default())
        .answer("Book", "Why?", "en", &history)
        .await
        .unwrap();
    let reply = ChatResponder::new(other.clone(), ChatConfig::default())
        .answer("Book", "Why?", "pt-BR", &history)
        .await
        .unwrap();

    assert_eq!(english.requests(), other.requests());
    assert!(reply.language_fallback);
}

#[tokio::test]
async fn supported_language_selects_its_instruction() {
    let model = Arc::new(RecordingModel::answering("ответ"));
    let reply = ChatResponder::new(model.clone(), ChatConfig::default())
        .answer("Книга", "О чём книга?", "ru", &[])
        .await
        .unwrap();

    assert_eq!(reply.language, Language::Ru);
    assert!(!reply.language_fallback);
    assert_eq!(
        model.requests()[0].messages[0].content,
        prompts::chat_instruction(Language::Ru)
    );
}

#[tokio::test]
async fn book_under_budget_is_sliced_without_marker() {
    let model = Arc::new(RecordingModel::answering("a"));
    let content = "z".repeat(10_000);
    ChatResponder::new(model.clone(), ChatConfig::default())
        .answer(&content, "q", "en", &[])
        .await
        .unwrap();

    let context = &model.requests()[0].messages[1].content;
    assert_eq!(context, &format!("Book content: {}", "z".repeat(6_000)));
    assert!(!context.contains(TRUNCATION_MARKER));
}

#[tokio::test]
async fn book_over_budget_shows_marker_when_window_reaches_it() {
    let model = Arc::new(RecordingModel::answering("a"));
    let config = ChatConfig {
        context_window_chars: 100_000,
        ..ChatConfig::default()
    };
    let threshold = config.budget.max_chars();
    let content = "z".repeat(threshold + 2_000);
    ChatResponder::new(model.clone(), config)
        .answer(&content, "q", "en", &[])
        .await
        .unwrap();

    let context = &model.requests()[0].messages[1].content;
    assert_eq!(
        context,
        &format!("Book content: {}{}", "z".repeat(threshold), TRUNCATION_MARKER)
    );
}

#[tokio::test]
async fn book_over_budget_with_default_window_is_plain_prefix() {
    let model = Arc::new(RecordingModel::answering("a"));
    let content = "z".repeat(50_000);
    ChatResponder::new(model.clone(), ChatConfig::default())
        .answer(&content, "q", "en", &[])
        .await
        .unwrap();

    let context = &model.requests()[0].messages[1].content;
    assert_eq!(context, &format!("Book content: {}", "z".repeat(6_000)));
}

#[tokio::test]
async fn upstream_failure_is_returned_not_masked() {
    let model = Arc::new(RecordingModel::new(|_| {
        Err(LLMError::Authentication("invalid key".to_string()))
    }));
    let err = ChatResponder::new(model, ChatConfig::default())
        .answer("Book", "q", "en", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Chat(LLMError::Authentication(_))));
    assert!(err.failed_sections().is_empty());
}

#[tokio::test]
async fn history_window_follows_config() {
    let model = Arc::new(RecordingModel::answering("a"));
    let config = ChatConfig {
        history_turns: 2,
        ..ChatConfig::default()
    };
    ChatResponder::new(model.clone(), config)
        .answer("Book", "next", "en", &seven_turns())
        .await
        .unwrap();

    let messages = &model.requests()[0].messages;
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[2].content, "answer 5");
    assert_eq!(messages[3].content, "question 6");
}
