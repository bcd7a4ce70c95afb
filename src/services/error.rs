use crate::models::{GuideDraft, Section};
use crate::error::LLMError;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("{section} generation failed: {source}")]
    Section {
        section: Section,
        #[source]
        source: LLMError,
    },
    #[error("guide incomplete, failed sections: {}", join_sections(.failed))]
    Incomplete {
        draft: Box<GuideDraft>,
        failed: Vec<Section>,
    },
    #[error("chat answer failed: {0}")]
    Chat(#[source] LLMError),
}

impl GenerationError {
    pub fn failed_sections(&self) -> Vec<Section> {
        match self {
            GenerationError::Section { section, .. } => vec![*section],
            GenerationError::Incomplete { failed, .. } => failed.clone(),
            GenerationError::Chat(_) => Vec::new(),
        }
    }
}

fn join_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|section| section.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
