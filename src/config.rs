use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Approximate budget for book text expressed in model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContentBudget {
    pub max_tokens: usize,
    pub chars_per_token: usize,
}

impl ContentBudget {
    pub fn max_chars(&self) -> usize {
        self.max_tokens.saturating_mul(self.chars_per_token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: None,
            model: "gpt-4".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideConfig {
    pub budget: ContentBudget,
    /// Characters of book text sent with each section call.
    pub section_window_chars: usize,
    pub temperature: f32,
    pub chapters_max_tokens: u32,
    pub synthesis_max_tokens: u32,
    pub quiz_max_tokens: u32,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            budget: ContentBudget {
                max_tokens: 15_000,
                chars_per_token: 4,
            },
            section_window_chars: 5_000,
            temperature: 0.7,
            chapters_max_tokens: 2_000,
            synthesis_max_tokens: 1_500,
            quiz_max_tokens: 1_500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub budget: ContentBudget,
    /// Characters of book text placed in the system context.
    pub context_window_chars: usize,
    pub history_turns: usize,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            budget: ContentBudget {
                max_tokens: 12_000,
                chars_per_token: 4,
            },
            context_window_chars: 6_000,
            history_turns: 5,
            temperature: 0.7,
            max_tokens: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub guide: GuideConfig,
    pub chat: ChatConfig,
    pub server: ServerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from defaults overlaid with whatever `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("LLM_API_URL") {
            config.llm.api_url = url;
        }
        if let Some(key) = lookup("LLM_API_KEY") {
            config.llm.api_key = Some(key).filter(|key| !key.trim().is_empty());
        }
        if let Some(model) = lookup("LLM_MODEL") {
            config.llm.model = model;
        }
        if let Some(addr) = lookup("BOOKGUIDE_BIND_ADDR") {
            config.server.bind_addr = addr;
        }

        parse_into(&lookup, "LLM_TIMEOUT_SECS", &mut config.llm.timeout_secs)?;
        parse_into(&lookup, "GUIDE_MAX_TOKENS", &mut config.guide.budget.max_tokens)?;
        parse_into(
            &lookup,
            "GUIDE_SECTION_WINDOW_CHARS",
            &mut config.guide.section_window_chars,
        )?;
        parse_into(&lookup, "CHAT_MAX_TOKENS", &mut config.chat.budget.max_tokens)?;
        parse_into(&lookup, "CHAT_HISTORY_TURNS", &mut config.chat.history_turns)?;

        Ok(config)
    }
}

fn parse_into<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {key}: {raw:?}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_generation_policy() {
        let config = Config::default();
        assert_eq!(config.guide.budget.max_chars(), 60_000);
        assert_eq!(config.chat.budget.max_chars(), 48_000);
        assert_eq!(config.guide.section_window_chars, 5_000);
        assert_eq!(config.chat.context_window_chars, 6_000);
        assert_eq!(config.chat.history_turns, 5);
        assert!(config.chat.max_tokens < config.guide.synthesis_max_tokens);
        assert!(config.guide.chapters_max_tokens > config.guide.quiz_max_tokens);
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("LLM_MODEL", "gpt-4o-mini"),
            ("LLM_API_KEY", "sk-test"),
            ("CHAT_HISTORY_TURNS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.chat.history_turns, 3);
    }

    #[test]
    fn blank_api_key_means_none() {
        let config = Config::from_lookup(lookup_from(&[("LLM_API_KEY", "  ")])).unwrap();
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn bad_number_is_reported() {
        let err = Config::from_lookup(lookup_from(&[("GUIDE_MAX_TOKENS", "lots")])).unwrap_err();
        assert!(err.to_string().contains("GUIDE_MAX_TOKENS"));
    }
}
