pub mod chat;
pub mod error;
pub mod guide;
pub mod llm;
pub mod prompts;

pub use chat::ChatResponder;
pub use error::GenerationError;
pub use guide::GuideGenerator;
pub use llm::{LLMClient, LLMError, LanguageModel};
