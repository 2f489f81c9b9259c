//! Enum-dispatched text-generation service.
//!
//! Exactly one backend is active per run; [`LlmService::from_config`] picks
//! it from [`LlmModelConfig::provider`]. Callers only see
//! [`LlmService::generate`], which returns plain text regardless of the
//! upstream response shape.

use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    services::{gemini_service::GeminiService, open_ai_service::OpenAiService},
};

/// Concrete backend client.
#[derive(Debug)]
pub enum LlmService {
    OpenAi(OpenAiService),
    Gemini(GeminiService),
}

impl LlmService {
    /// Builds the backend selected by `cfg.provider`.
    ///
    /// # Errors
    /// Propagates constructor validation errors (missing key, bad endpoint).
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        debug!(provider = %cfg.provider, model = %cfg.model, "init llm service");
        Ok(match cfg.provider {
            LlmProvider::OpenAI => Self::OpenAi(OpenAiService::new(cfg)?),
            LlmProvider::Gemini => Self::Gemini(GeminiService::new(cfg)?),
        })
    }

    /// Which backend this instance talks to.
    pub fn provider(&self) -> LlmProvider {
        match self {
            Self::OpenAi(_) => LlmProvider::OpenAI,
            Self::Gemini(_) => LlmProvider::Gemini,
        }
    }

    /// Generates a completion for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        match self {
            Self::OpenAi(s) => s.generate(prompt).await,
            Self::Gemini(s) => s.generate(prompt).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(provider: LlmProvider) -> LlmModelConfig {
        LlmModelConfig {
            provider,
            model: "m".into(),
            endpoint: "https://example.invalid".into(),
            api_key: Some("k".into()),
            max_tokens: None,
            temperature: None,
            timeout_secs: Some(1),
        }
    }

    #[test]
    fn dispatches_on_provider() {
        let openai = LlmService::from_config(cfg(LlmProvider::OpenAI)).unwrap();
        assert_eq!(openai.provider(), LlmProvider::OpenAI);

        let gemini = LlmService::from_config(cfg(LlmProvider::Gemini)).unwrap();
        assert_eq!(gemini.provider(), LlmProvider::Gemini);
    }

    #[test]
    fn missing_key_fails_construction() {
        let mut c = cfg(LlmProvider::Gemini);
        c.api_key = None;
        assert!(LlmService::from_config(c).is_err());
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let mut c = cfg(LlmProvider::OpenAI);
        c.endpoint = "http://127.0.0.1:9".into();
        let svc = LlmService::from_config(c).unwrap();
        let err = svc.generate("hi").await.unwrap_err();
        assert!(matches!(err, AiLlmError::HttpTransport(_)));
    }
}
