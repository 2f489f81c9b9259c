//! Run configuration, read once at startup.
//!
//! # Environment variables
//! - `REPO_TOKEN`       GitHub token (required)
//! - `REPO_REPOSITORY`  `owner/repo` (required)
//! - `REPO_PR_NUMBER`   pull-request number (required)
//! - `GITHUB_API_URL`   REST base (default `https://api.github.com`)
//! - `REVIEW_DRY_RUN`   `1|true|yes|on` → log instead of posting
//! - backend selection and keys: see `ai_llm_service::config::default_config`

use ai_llm_service::LlmModelConfig;
use ai_llm_service::config::default_config::config_from_lookup;
use ai_llm_service::error_handler::{opt_var, process_env};

use crate::errors::{ConfigError, ReviewResult};
use crate::git_providers::{DEFAULT_GITHUB_API, GitHubConfig, PullRequestId, RepoRef};
use crate::publish::PublishConfig;

/// Everything a single review run needs.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    pub github: GitHubConfig,
    pub pr: PullRequestId,
    pub llm: LlmModelConfig,
    pub publish: PublishConfig,
}

impl ReviewConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> ReviewResult<Self> {
        Self::from_lookup(&process_env)
    }

    /// Reads the configuration through `lookup` (key → value).
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] for missing token/repository/PR number
    /// - [`ConfigError::InvalidRepository`] / [`ConfigError::InvalidNumber`] for malformed values
    /// - `Error::Llm` when the backend selection or its key is invalid
    pub fn from_lookup<F>(lookup: &F) -> ReviewResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = required(lookup, "REPO_TOKEN")?;
        let repo: RepoRef = required(lookup, "REPO_REPOSITORY")?.parse()?;
        let raw_number = required(lookup, "REPO_PR_NUMBER")?;
        let number = raw_number
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidNumber {
                var: "REPO_PR_NUMBER",
                value: raw_number,
            })?;

        let base_api =
            opt_var(lookup, "GITHUB_API_URL").unwrap_or_else(|| DEFAULT_GITHUB_API.to_string());

        let llm = config_from_lookup(lookup)?;

        let dry_run = opt_var(lookup, "REVIEW_DRY_RUN")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        Ok(Self {
            github: GitHubConfig { base_api, token },
            pr: PullRequestId { repo, number },
            llm,
            publish: PublishConfig { dry_run },
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    opt_var(lookup, name).ok_or(ConfigError::MissingVar(name))
}

fn is_truthy(v: &str) -> bool {
    matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use ai_llm_service::LlmProvider;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k: &str| map.get(k).cloned()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("REPO_TOKEN", "ghp_x"),
            ("REPO_REPOSITORY", "octo/widgets"),
            ("REPO_PR_NUMBER", "17"),
            ("GEMINI_API_KEY", "g"),
        ]
    }

    #[test]
    fn minimal_env_uses_defaults() {
        let cfg = ReviewConfig::from_lookup(&lookup_from(&base())).unwrap();
        assert_eq!(cfg.pr.repo.owner, "octo");
        assert_eq!(cfg.pr.repo.repo, "widgets");
        assert_eq!(cfg.pr.number, 17);
        assert_eq!(cfg.github.base_api, DEFAULT_GITHUB_API);
        assert_eq!(cfg.llm.provider, LlmProvider::Gemini);
        assert!(!cfg.publish.dry_run);
    }

    #[test]
    fn dry_run_and_openai_selection() {
        let mut env = base();
        env.extend([
            ("API_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk"),
            ("REVIEW_DRY_RUN", "Yes"),
            ("GITHUB_API_URL", "https://ghe.example.com/api/v3"),
        ]);
        let cfg = ReviewConfig::from_lookup(&lookup_from(&env)).unwrap();
        assert_eq!(cfg.llm.provider, LlmProvider::OpenAI);
        assert!(cfg.publish.dry_run);
        assert_eq!(cfg.github.base_api, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn missing_token_is_fatal() {
        let env: Vec<_> = base().into_iter().filter(|(k, _)| *k != "REPO_TOKEN").collect();
        let err = ReviewConfig::from_lookup(&lookup_from(&env)).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingVar("REPO_TOKEN"))
        ));
    }

    #[test]
    fn bad_repository_and_number() {
        let mut env = base();
        env[1] = ("REPO_REPOSITORY", "widgets");
        assert!(matches!(
            ReviewConfig::from_lookup(&lookup_from(&env)).unwrap_err(),
            Error::Config(ConfigError::InvalidRepository(_))
        ));

        let mut env = base();
        env[2] = ("REPO_PR_NUMBER", "0");
        assert!(matches!(
            ReviewConfig::from_lookup(&lookup_from(&env)).unwrap_err(),
            Error::Config(ConfigError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn missing_llm_key_surfaces_as_llm_error() {
        let env: Vec<_> = base()
            .into_iter()
            .filter(|(k, _)| *k != "GEMINI_API_KEY")
            .collect();
        assert!(matches!(
            ReviewConfig::from_lookup(&lookup_from(&env)).unwrap_err(),
            Error::Llm(_)
        ));
    }
}
