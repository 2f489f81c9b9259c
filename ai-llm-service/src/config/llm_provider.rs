use std::{fmt, str::FromStr};

use crate::error_handler::ConfigError;

/// Represents the backend used for text generation.
///
/// Selected by the `API_PROVIDER` environment variable; parsing is
/// case-insensitive and ignores surrounding whitespace.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let p: LlmProvider = "OpenAI".parse().unwrap();
/// assert_eq!(p, LlmProvider::OpenAI);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LlmProvider {
    /// OpenAI chat completions API.
    OpenAI,
    /// Google Gemini `generateContent` API.
    #[default]
    Gemini,
}

impl LlmProvider {
    /// Stable lowercase identifier (matches the accepted env values).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" => Ok(Self::Gemini),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_providers() {
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAI);
        assert_eq!(" Gemini ".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "ollama".parse::<LlmProvider>().unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedProvider(ref p) if p == "ollama"));
    }

    #[test]
    fn defaults_to_gemini() {
        assert_eq!(LlmProvider::default(), LlmProvider::Gemini);
    }
}
