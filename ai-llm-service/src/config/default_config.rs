//! Default backend configs loaded from environment variables.
//!
//! The `*_with` constructors take a lookup closure (`Fn(&str) -> Option<String>`)
//! so callers can feed values from somewhere other than the process
//! environment (pass [`crate::error_handler::process_env`] for the real one).
//!
//! # Environment variables
//!
//! Common:
//! - `API_PROVIDER`     = `openai` | `gemini` (default `gemini`)
//! - `LLM_MAX_TOKENS`   = optional max tokens (u32)
//! - `LLM_TIMEOUT_SECS` = optional request timeout (u64)
//! - `LLM_TEMPERATURE`  = optional sampling temperature (f32)
//!
//! OpenAI:
//! - `OPENAI_API_KEY` (mandatory when selected)
//! - `OPENAI_MODEL`   (default `gpt-4o-mini`)
//! - `OPENAI_URL`     (default `https://api.openai.com`)
//!
//! Gemini:
//! - `GEMINI_API_KEY` (mandatory when selected)
//! - `GEMINI_MODEL`   (default `gemini-1.5-flash`)
//! - `GEMINI_URL`     (default `https://generativelanguage.googleapis.com`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, must_var, opt_f32, opt_u32, opt_u64, opt_var, validate_http_endpoint,
    },
};

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Generation cap applied to OpenAI when `LLM_MAX_TOKENS` is not set.
pub const DEFAULT_OPENAI_MAX_TOKENS: u32 = 1000;

/// Resolves the provider from `API_PROVIDER` and builds its config.
///
/// # Errors
/// - [`crate::error_handler::ConfigError::UnsupportedProvider`] for unknown values
/// - whatever the provider-specific constructor returns
pub fn config_from_lookup<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let provider = match opt_var(lookup, "API_PROVIDER") {
        Some(v) => v.parse::<LlmProvider>()?,
        None => LlmProvider::default(),
    };
    match provider {
        LlmProvider::OpenAI => config_openai_with(lookup),
        LlmProvider::Gemini => config_gemini_with(lookup),
    }
}

/// Constructs the OpenAI chat-completions config.
///
/// # Defaults
/// - `max_tokens = Some(1000)`
/// - `timeout_secs = Some(120)`
pub fn config_openai_with<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(lookup, "OPENAI_API_KEY")?;
    let endpoint = opt_var(lookup, "OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.into());
    validate_http_endpoint("OPENAI_URL", &endpoint)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAI,
        model: opt_var(lookup, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
        endpoint,
        api_key: Some(api_key),
        max_tokens: Some(opt_u32(lookup, "LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_OPENAI_MAX_TOKENS)),
        temperature: opt_f32(lookup, "LLM_TEMPERATURE")?,
        timeout_secs: Some(opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(120)),
    })
}

/// Constructs the Gemini `generateContent` config.
///
/// # Defaults
/// - `max_tokens = None` (provider default)
/// - `timeout_secs = Some(120)`
pub fn config_gemini_with<F>(lookup: &F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = must_var(lookup, "GEMINI_API_KEY")?;
    let endpoint = opt_var(lookup, "GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.into());
    validate_http_endpoint("GEMINI_URL", &endpoint)?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Gemini,
        model: opt_var(lookup, "GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.into()),
        endpoint,
        api_key: Some(api_key),
        max_tokens: opt_u32(lookup, "LLM_MAX_TOKENS")?,
        temperature: opt_f32(lookup, "LLM_TEMPERATURE")?,
        timeout_secs: Some(opt_u64(lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(120)),
    })
}
