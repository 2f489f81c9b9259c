//! Publisher.
//!
//! Posts validated comments to the pull request as inline review comments.
//!
//! - Comments bind to `line` on the `RIGHT` side at the PR head commit.
//! - Idempotency: a hidden marker is embedded in every body; comments whose
//!   marker is already present on the PR are skipped.
//! - Dry-run: log what would be posted without calling the API.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::errors::ReviewResult;
use crate::git_providers::{DiffSide, GitHubClient, NewReviewComment, PullRequestId};
use crate::review::ValidatedComment;

/// Hidden marker prefix. Example: `<!-- pr-review:key=src/a.rs:42#1f2e3d4c5b6a -->`
const MARKER_PREFIX: &str = "<!-- pr-review:key=";
const MARKER_SUFFIX: &str = " -->";

static MARKER_RE: OnceLock<Regex> = OnceLock::new();

fn marker_re() -> &'static Regex {
    MARKER_RE.get_or_init(|| Regex::new(r"<!-- pr-review:key=(.+?) -->").expect("valid marker regex"))
}

/// Configuration for the publishing step.
#[derive(Debug, Clone, Default)]
pub struct PublishConfig {
    /// If true, do not send anything; just log what would be posted.
    pub dry_run: bool,
}

/// What happened to a single validated comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Created on GitHub.
    Posted { comment_id: u64 },
    /// Same finding already present on the PR.
    Duplicate,
    /// Dry-run: nothing sent.
    DryRun,
}

/// Stable idempotency key: path, line and a short hash of the body.
pub fn comment_key(path: &str, line: u32, body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{path}:{line}#{}", &digest[..12])
}

/// Body as posted: model text followed by the hidden marker.
pub fn render_body(body: &str, key: &str) -> String {
    format!("{body}\n\n{MARKER_PREFIX}{key}{MARKER_SUFFIX}")
}

/// Extracts the idempotency key from a posted body, if it has one.
pub fn extract_marker_key(body: &str) -> Option<String> {
    marker_re()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Posts comments for one pull request, one at a time.
#[derive(Debug)]
pub struct Publisher<'a> {
    client: &'a GitHubClient,
    id: &'a PullRequestId,
    commit_id: String,
    cfg: PublishConfig,
    existing: HashSet<String>,
}

impl<'a> Publisher<'a> {
    pub fn new(
        client: &'a GitHubClient,
        id: &'a PullRequestId,
        commit_id: impl Into<String>,
        cfg: PublishConfig,
    ) -> Self {
        Self {
            client,
            id,
            commit_id: commit_id.into(),
            cfg,
            existing: HashSet::new(),
        }
    }

    /// Loads markers of comments already on the PR.
    ///
    /// Best-effort: a failure is logged and leaves the set empty.
    pub async fn load_existing_markers(&mut self) {
        match self.client.list_review_comments(self.id).await {
            Ok(comments) => {
                self.existing = comments
                    .iter()
                    .filter_map(|c| extract_marker_key(&c.body))
                    .collect();
                info!(
                    "publish: existing review comments={} markers={}",
                    comments.len(),
                    self.existing.len()
                );
            }
            Err(e) => {
                warn!("publish: could not list existing comments, duplicates not detected: {e}");
            }
        }
    }

    /// Publishes one validated comment.
    ///
    /// # Errors
    /// Upstream failures from the create-comment call. Callers treat these as
    /// local to the comment.
    pub async fn publish(&mut self, comment: &ValidatedComment) -> ReviewResult<PublishOutcome> {
        let key = comment_key(&comment.path, comment.line, &comment.body);
        if self.existing.contains(&key) {
            debug!("publish: skip duplicate key={}", key);
            return Ok(PublishOutcome::Duplicate);
        }

        if self.cfg.dry_run {
            info!(
                "publish(dry-run): {}:{} → {}",
                comment.path, comment.line, comment.body
            );
            self.existing.insert(key);
            return Ok(PublishOutcome::DryRun);
        }

        let body = render_body(&comment.body, &key);
        let created = self
            .client
            .create_review_comment(
                self.id,
                &NewReviewComment {
                    body: &body,
                    path: &comment.path,
                    line: comment.line,
                    side: DiffSide::Right,
                    commit_id: &self.commit_id,
                },
            )
            .await?;

        info!(
            "publish: comment added {}:{} id={} {}",
            comment.path,
            comment.line,
            created.id,
            created.html_url.as_deref().unwrap_or("")
        );
        self.existing.insert(key);
        Ok(PublishOutcome::Posted {
            comment_id: created.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_stable_and_body_sensitive() {
        let a = comment_key("src/a.rs", 42, "Use `?` here.");
        let b = comment_key("src/a.rs", 42, "Use `?` here.");
        let c = comment_key("src/a.rs", 42, "Different text.");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("src/a.rs:42#"));
        assert_eq!(a.len(), "src/a.rs:42#".len() + 12);
    }

    #[test]
    fn marker_round_trips_through_body() {
        let key = comment_key("dir with space/x.ts", 7, "nit");
        let body = render_body("nit", &key);
        assert!(body.starts_with("nit\n\n<!-- pr-review:key="));
        assert_eq!(extract_marker_key(&body).as_deref(), Some(key.as_str()));
    }

    #[test]
    fn bodies_without_marker_have_no_key() {
        assert_eq!(extract_marker_key("LGTM"), None);
        assert_eq!(extract_marker_key("<!-- mrai:key=x -->"), None);
    }
}
