//! Study-guide generation and book-grounded chat on top of a chat-completions
//! language model.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use models::{ChatTurn, Guide, GuideRequest, GuideType, Language, Section};
pub use services::{ChatResponder, GenerationError, GuideGenerator, LLMClient, LanguageModel};
