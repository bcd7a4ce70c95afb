use crate::config::GuideConfig;
use crate::models::{Guide, GuideDraft, GuideRequest, GuideType, Language, Section, SectionReply};
use crate::services::error::GenerationError;
use crate::services::llm::{CompletionRequest, LLMError, LanguageModel, Message};
use crate::services::prompts;
use crate::utils::text;
use std::sync::Arc;

/// Builds three-section study guides from book text.
pub struct GuideGenerator {
    model: Arc<dyn LanguageModel>,
    config: GuideConfig,
}

impl GuideGenerator {
    pub fn new(model: Arc<dyn LanguageModel>, config: GuideConfig) -> Self {
        Self { model, config }
    }

    fn max_tokens(&self, section: Section) -> u32 {
        match section {
            Section::Chapters => self.config.chapters_max_tokens,
            Section::Synthesis => self.config.synthesis_max_tokens,
            Section::Quiz => self.config.quiz_max_tokens,
        }
    }

    /// The exact request sent upstream for one section. `language` must
    /// already be resolved.
    pub fn section_request(
        &self,
        content: &str,
        title: &str,
        author: Option<&str>,
        language: Language,
        guide_type: GuideType,
        section: Section,
    ) -> CompletionRequest {
        let book_text = text::window(
            content,
            self.config.budget.max_chars(),
            self.config.section_window_chars,
        );
        let instruction = prompts::section_instruction(language, section, title, author);

        CompletionRequest {
            messages: vec![
                Message::system(prompts::system_instruction(language, guide_type)),
                Message::user(format!("{instruction}\n\nBook content: {book_text}")),
            ],
            temperature: self.config.temperature,
            max_tokens: self.max_tokens(section),
        }
    }

    async fn run_section(
        &self,
        content: &str,
        title: &str,
        author: Option<&str>,
        language: Language,
        guide_type: GuideType,
        section: Section,
    ) -> Result<String, LLMError> {
        let request = self.section_request(content, title, author, language, guide_type, section);
        tracing::debug!(%section, %language, "requesting guide section");

        match self.model.complete(request).await {
            Ok(text) => {
                tracing::info!(%section, chars = text.chars().count(), "guide section generated");
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(%section, error = %e, "guide section failed");
                Err(e)
            }
        }
    }

    /// Generate a single section, e.g. to retry one that failed.
    pub async fn generate_section(
        &self,
        content: &str,
        request: &GuideRequest,
        section: Section,
    ) -> Result<SectionReply, GenerationError> {
        let selection = prompts::resolve_language(&request.language);
        let content = self
            .run_section(
                content,
                &request.title,
                request.author.as_deref(),
                selection.language,
                request.guide_type,
                section,
            )
            .await
            .map_err(|source| GenerationError::Section { section, source })?;

        Ok(SectionReply {
            section,
            content,
            language: selection.language,
            language_fallback: selection.fell_back,
        })
    }

    /// Run all three section calls concurrently and keep each outcome.
    pub async fn generate_draft(&self, content: &str, request: &GuideRequest) -> GuideDraft {
        let selection = prompts::resolve_language(&request.language);
        let language = selection.language;
        let title = request.title.as_str();
        let author = request.author.as_deref();
        let guide_type = request.guide_type;

        tracing::info!(
            title,
            %language,
            %guide_type,
            content_chars = content.chars().count(),
            "generating guide"
        );

        let (chapters, synthesis, quiz) = tokio::join!(
            self.run_section(content, title, author, language, guide_type, Section::Chapters),
            self.run_section(content, title, author, language, guide_type, Section::Synthesis),
            self.run_section(content, title, author, language, guide_type, Section::Quiz),
        );

        GuideDraft {
            title: request.title.clone(),
            author: request.author.clone(),
            language: selection,
            guide_type,
            chapters,
            synthesis,
            quiz,
        }
    }

    /// Generate a guide, failing if any section could not be produced.
    pub async fn generate(
        &self,
        content: &str,
        request: &GuideRequest,
    ) -> Result<Guide, GenerationError> {
        let draft = self.generate_draft(content, request).await;
        finish(draft)
    }

    /// Re-run only the failed sections of an earlier draft.
    pub async fn complete_draft(
        &self,
        content: &str,
        mut draft: GuideDraft,
    ) -> Result<Guide, GenerationError> {
        for section in draft.failed_sections() {
            let result = self
                .run_section(
                    content,
                    &draft.title,
                    draft.author.as_deref(),
                    draft.language.language,
                    draft.guide_type,
                    section,
                )
                .await;
            draft.set_section(section, result);
        }
        finish(draft)
    }
}

fn finish(draft: GuideDraft) -> Result<Guide, GenerationError> {
    draft.into_guide().map_err(|draft| {
        let failed = draft.failed_sections();
        tracing::error!(title = %draft.title, ?failed, "guide generation incomplete");
        GenerationError::Incomplete {
            draft: Box::new(draft),
            failed,
        }
    })
}
