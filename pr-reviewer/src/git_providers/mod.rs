//! Hosting provider facade.
//!
//! Only GitHub is supported; the client is a concrete type with plain
//! `async fn`s (no async-trait, no boxed futures).

pub mod github;
pub mod types;

pub use github::GitHubClient;
pub use types::*;

/// Default REST base used when `GITHUB_API_URL` is not set.
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

/// Runtime configuration for the GitHub client.
#[derive(Clone)]
pub struct GitHubConfig {
    /// API base, e.g. "https://api.github.com" or a GHES "https://host/api/v3".
    pub base_api: String,
    /// Access token (PAT, app token or the workflow `GITHUB_TOKEN`).
    pub token: String,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("base_api", &self.base_api)
            .field("token", &"<redacted>")
            .finish()
    }
}
