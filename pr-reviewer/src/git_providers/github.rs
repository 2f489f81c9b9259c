//! GitHub provider (REST v3) for PR metadata, changed files and review comments.
//!
//! Endpoints used:
//! - GET  /repos/{owner}/{repo}/pulls/{number}
//! - GET  /repos/{owner}/{repo}/pulls/{number}/files      (field "patch" is unified diff)
//! - GET  /repos/{owner}/{repo}/pulls/{number}/comments
//! - POST /repos/{owner}/{repo}/pulls/{number}/comments

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error};

use crate::errors::{ConfigError, ProviderError, ReviewResult};
use crate::git_providers::GitHubConfig;
use crate::git_providers::types::*;

/// GitHub caps the files listing at 3000 entries (30 pages of 100).
const PER_PAGE: usize = 100;
const MAX_FILE_PAGES: u32 = 30;
const MAX_COMMENT_PAGES: u32 = 50;

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String, // "https://api.github.com"
}

impl GitHubClient {
    /// Builds a client with auth and API-version headers preset.
    pub fn new(cfg: &GitHubConfig) -> ReviewResult<Self> {
        let base_api = cfg.base_api.trim().trim_end_matches('/').to_string();
        if !(base_api.starts_with("http://") || base_api.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(cfg.base_api.clone()).into());
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", cfg.token))
            .map_err(|_| ConfigError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        let http = Client::builder()
            .user_agent(concat!("pr-reviewer/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base_api })
    }

    fn pulls_url(&self, id: &PullRequestId) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api,
            urlencoding::encode(&id.repo.owner),
            urlencoding::encode(&id.repo.repo),
            id.number
        )
    }

    /// Fetches PR metadata (head commit SHA is what comments bind to).
    pub async fn get_pull_request(&self, id: &PullRequestId) -> ReviewResult<PullRequest> {
        let url = self.pulls_url(id);
        debug!("github: GET {}", url);
        send_json(self.http.get(url)).await
    }

    /// Lists all changed files of the PR, following pagination.
    pub async fn list_changed_files(&self, id: &PullRequestId) -> ReviewResult<Vec<ChangedFile>> {
        let url = format!("{}/files", self.pulls_url(id));
        self.get_paginated(&url, MAX_FILE_PAGES).await
    }

    /// Lists existing review comments (used to skip already-posted findings).
    pub async fn list_review_comments(
        &self,
        id: &PullRequestId,
    ) -> ReviewResult<Vec<ExistingComment>> {
        let url = format!("{}/comments", self.pulls_url(id));
        self.get_paginated(&url, MAX_COMMENT_PAGES).await
    }

    /// Creates a single inline review comment.
    pub async fn create_review_comment(
        &self,
        id: &PullRequestId,
        comment: &NewReviewComment<'_>,
    ) -> ReviewResult<CreatedComment> {
        let url = format!("{}/comments", self.pulls_url(id));
        debug!(
            "github: POST {} path={} line={}",
            url, comment.path, comment.line
        );
        send_json(self.http.post(url).json(comment)).await
    }

    /// Collects `page=1..` until a short page or `max_pages` is reached.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        url: &str,
        max_pages: u32,
    ) -> ReviewResult<Vec<T>> {
        let mut out = Vec::new();
        for page in 1..=max_pages {
            let page_url = format!("{url}?per_page={PER_PAGE}&page={page}");
            debug!("github: GET {}", page_url);
            let items: Vec<T> = send_json(self.http.get(page_url)).await?;
            let n = items.len();
            out.extend(items);
            if n < PER_PAGE {
                break;
            }
        }
        Ok(out)
    }
}

/// Sends the request and decodes a JSON body, mapping non-2xx statuses to
/// [`ProviderError`] with GitHub's error message attached.
async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> ReviewResult<T> {
    let resp = check_status(req.send().await?).await?;
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes).map_err(ProviderError::from)?)
}

async fn check_status(resp: Response) -> ReviewResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let url = resp.url().to_string();
    let retry_after = resp
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());
    let body = resp.text().await.unwrap_or_default();
    let message = github_error_message(&body);
    error!(status = status.as_u16(), %url, %message, "github: request failed");
    Err(ProviderError::from_status(status.as_u16(), retry_after, message).into())
}

/// Renders GitHub's error payload (`message` + first `errors[]` detail).
///
/// Non-JSON bodies are trimmed to a short snippet.
pub fn github_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
        #[serde(default)]
        errors: Vec<ErrorDetail>,
    }
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorDetail {
        Object {
            #[serde(default)]
            message: Option<String>,
            #[serde(default)]
            code: Option<String>,
        },
        Text(String),
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(e) => {
            let detail = e.errors.into_iter().find_map(|d| match d {
                ErrorDetail::Object { message, code } => message.or(code),
                ErrorDetail::Text(t) => Some(t),
            });
            match detail {
                Some(d) => format!("{} ({})", e.message, d),
                None => e.message,
            }
        }
        Err(_) => body.trim().chars().take(240).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(base: &str) -> GitHubConfig {
        GitHubConfig {
            base_api: base.into(),
            token: "ghp_test".into(),
        }
    }

    fn id() -> PullRequestId {
        PullRequestId {
            repo: RepoRef {
                owner: "octo".into(),
                repo: "widgets".into(),
            },
            number: 42,
        }
    }

    #[test]
    fn builds_pull_urls() {
        let c = GitHubClient::new(&cfg("https://api.github.com/")).unwrap();
        assert_eq!(
            c.pulls_url(&id()),
            "https://api.github.com/repos/octo/widgets/pulls/42"
        );
    }

    #[test]
    fn rejects_base_without_scheme() {
        assert!(GitHubClient::new(&cfg("api.github.com")).is_err());
    }

    #[test]
    fn error_message_with_detail() {
        let body = r#"{"message":"Validation Failed","errors":[{"resource":"PullRequestReviewComment","code":"custom","field":"pull_request_review_thread.line","message":"could not be resolved"}],"documentation_url":"https://docs.github.com"}"#;
        assert_eq!(
            github_error_message(body),
            "Validation Failed (could not be resolved)"
        );
    }

    #[test]
    fn error_message_plain() {
        assert_eq!(
            github_error_message(r#"{"message":"Bad credentials"}"#),
            "Bad credentials"
        );
        assert_eq!(github_error_message("  gateway timeout  "), "gateway timeout");
    }

    #[test]
    fn error_message_with_string_errors() {
        let body = r#"{"message":"Unprocessable Entity","errors":["line must be part of the diff"]}"#;
        assert_eq!(
            github_error_message(body),
            "Unprocessable Entity (line must be part of the diff)"
        );
    }
}
