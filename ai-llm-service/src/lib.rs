//! Text-generation backends used by the PR review bot.
//!
//! Two interchangeable providers are supported, selected at runtime:
//! - **OpenAI** chat completions (`/v1/chat/completions`)
//! - **Gemini** content generation (`/v1beta/models/{model}:generateContent`)
//!
//! Both normalize the upstream response to a plain `String`. Dispatch is
//! enum-based (see [`llm_service::LlmService`]); no `async-trait` and no
//! boxed trait objects.

pub mod config;
pub mod error_handler;
pub mod llm_service;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, Result};
pub use llm_service::LlmService;
