use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::LLMError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Zh,
    Hi,
    Ru,
}

impl Language {
    pub const SUPPORTED: [Language; 5] = [
        Language::En,
        Language::Es,
        Language::Zh,
        Language::Hi,
        Language::Ru,
    ];

    pub const DEFAULT: Language = Language::En;

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Zh => "zh",
            Language::Hi => "hi",
            Language::Ru => "ru",
        }
    }

    /// Exact match against the supported codes. Case and surrounding
    /// whitespace are ignored; region subtags are not.
    pub fn from_code(code: &str) -> Option<Language> {
        let code = code.trim().to_ascii_lowercase();
        Self::SUPPORTED.into_iter().find(|lang| lang.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Outcome of normalizing a requested language code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageSelection {
    pub requested: String,
    pub language: Language,
    pub fell_back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideType {
    #[default]
    Standard,
    Academic,
    Practical,
    Summary,
}

impl GuideType {
    pub fn as_str(self) -> &'static str {
        match self {
            GuideType::Standard => "standard",
            GuideType::Academic => "academic",
            GuideType::Practical => "practical",
            GuideType::Summary => "summary",
        }
    }
}

impl FromStr for GuideType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "standard" => Ok(GuideType::Standard),
            "academic" => Ok(GuideType::Academic),
            "practical" => Ok(GuideType::Practical),
            "summary" => Ok(GuideType::Summary),
            other => Err(format!("unknown guide type: {other}")),
        }
    }
}

impl fmt::Display for GuideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three independently generated parts of a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Chapters,
    Synthesis,
    Quiz,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Chapters, Section::Synthesis, Section::Quiz];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Chapters => "chapters",
            Section::Synthesis => "synthesis",
            Section::Quiz => "quiz",
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chapters" => Ok(Section::Chapters),
            "synthesis" => Ok(Section::Synthesis),
            "quiz" => Ok(Section::Quiz),
            other => Err(format!("unknown section: {other}")),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideRequest {
    pub title: String,
    pub author: Option<String>,
    pub language: String,
    #[serde(default)]
    pub guide_type: GuideType,
}

/// A finished study guide. Every section holds the model's text verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    pub id: Uuid,
    pub title: String,
    pub author: Option<String>,
    pub language: Language,
    pub language_fallback: bool,
    pub guide_type: GuideType,
    pub chapters: String,
    pub synthesis: String,
    pub quiz: String,
    pub created_at: DateTime<Utc>,
}

/// Per-section results of one generation run.
#[derive(Debug)]
pub struct GuideDraft {
    pub title: String,
    pub author: Option<String>,
    pub language: LanguageSelection,
    pub guide_type: GuideType,
    pub chapters: Result<String, LLMError>,
    pub synthesis: Result<String, LLMError>,
    pub quiz: Result<String, LLMError>,
}

impl GuideDraft {
    pub fn section(&self, section: Section) -> &Result<String, LLMError> {
        match section {
            Section::Chapters => &self.chapters,
            Section::Synthesis => &self.synthesis,
            Section::Quiz => &self.quiz,
        }
    }

    pub fn set_section(&mut self, section: Section, result: Result<String, LLMError>) {
        match section {
            Section::Chapters => self.chapters = result,
            Section::Synthesis => self.synthesis = result,
            Section::Quiz => self.quiz = result,
        }
    }

    pub fn failed_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| self.section(*section).is_err())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failed_sections().is_empty()
    }

    /// Assemble the guide, or hand the draft back if any section failed.
    pub fn into_guide(self) -> Result<Guide, GuideDraft> {
        match (self.chapters, self.synthesis, self.quiz) {
            (Ok(chapters), Ok(synthesis), Ok(quiz)) => Ok(Guide {
                id: Uuid::new_v4(),
                title: self.title,
                author: self.author,
                language: self.language.language,
                language_fallback: self.language.fell_back,
                guide_type: self.guide_type,
                chapters,
                synthesis,
                quiz,
                created_at: Utc::now(),
            }),
            (chapters, synthesis, quiz) => Err(GuideDraft {
                title: self.title,
                author: self.author,
                language: self.language,
                guide_type: self.guide_type,
                chapters,
                synthesis,
                quiz,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub answer: String,
    pub language: Language,
    pub language_fallback: bool,
}

impl ChatReply {
    /// The (user, assistant) pair the caller appends to the stored history.
    pub fn into_turns(self, question: &str) -> [ChatTurn; 2] {
        [ChatTurn::user(question), ChatTurn::assistant(self.answer)]
    }
}

/// One regenerated section, with the language it was written in.
#[derive(Debug, Clone, Serialize)]
pub struct SectionReply {
    pub section: Section,
    pub content: String,
    pub language: Language,
    pub language_fallback: bool,
}

/// Outcome of a guide run as reported to the surrounding system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Processed,
    Failed,
}
