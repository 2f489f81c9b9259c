//! Data model for pull requests, changed files and review comments.
//!
//! Response types deserialize directly from the GitHub REST payloads (only
//! the fields we use); request types serialize to the POST bodies.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::parser::looks_like_binary_patch;

/// `owner/repo` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl FromStr for RepoRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(ConfigError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// A unique reference to a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestId {
    pub repo: RepoRef,
    pub number: u64,
}

impl fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo, self.number)
    }
}

/// Subset of `GET /repos/{owner}/{repo}/pulls/{number}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: String,
    pub head: GitRef,
    pub base: GitRef,
    #[serde(default)]
    pub html_url: Option<String>,
}

impl PullRequest {
    /// Latest commit on the PR branch; inline comments bind to it.
    pub fn head_sha(&self) -> &str {
        &self.head.sha
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitRef {
    pub sha: String,
    #[serde(default, rename = "ref")]
    pub name: Option<String>,
}

/// File status as reported by the files endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Removed,
    Modified,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    #[serde(other)]
    Unknown,
}

/// One entry of `GET /repos/{owner}/{repo}/pulls/{number}/files`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    pub status: FileStatus,
    #[serde(default)]
    pub additions: u32,
    #[serde(default)]
    pub deletions: u32,
    /// Unified diff for this file; absent for binaries and very large diffs.
    #[serde(default)]
    pub patch: Option<String>,
}

/// Why a changed file is not sent for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Removed,
    NoPatch,
    Binary,
}

impl ChangedFile {
    /// The patch to review, or the reason the file is skipped.
    pub fn reviewable_patch(&self) -> Result<&str, SkipReason> {
        if self.status == FileStatus::Removed {
            return Err(SkipReason::Removed);
        }
        match self.patch.as_deref() {
            None => Err(SkipReason::NoPatch),
            Some(p) if p.trim().is_empty() => Err(SkipReason::NoPatch),
            Some(p) if looks_like_binary_patch(p) => Err(SkipReason::Binary),
            Some(p) => Ok(p),
        }
    }
}

/// Subset of an existing pull-request review comment.
#[derive(Debug, Clone, Deserialize)]
pub struct ExistingComment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// Side of the diff a comment attaches to. `Right` is the new file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiffSide {
    Left,
    Right,
}

/// Body of `POST /repos/{owner}/{repo}/pulls/{number}/comments`.
#[derive(Debug, Clone, Serialize)]
pub struct NewReviewComment<'a> {
    pub body: &'a str,
    pub path: &'a str,
    pub line: u32,
    pub side: DiffSide,
    pub commit_id: &'a str,
}

/// Subset of the created comment returned by GitHub.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedComment {
    pub id: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_ref_parsing() {
        let r: RepoRef = "octo/widgets".parse().unwrap();
        assert_eq!(r.owner, "octo");
        assert_eq!(r.repo, "widgets");
        assert_eq!(r.to_string(), "octo/widgets");

        assert!("octo".parse::<RepoRef>().is_err());
        assert!("/widgets".parse::<RepoRef>().is_err());
        assert!("a/b/c".parse::<RepoRef>().is_err());
    }

    #[test]
    fn changed_file_deserializes_and_filters() {
        let raw = r#"[
            {"sha":"1","filename":"src/a.rs","status":"modified","additions":1,"deletions":0,
             "patch":"@@ -1 +1,2 @@\n a\n+b"},
            {"sha":"2","filename":"logo.png","status":"added","additions":0,"deletions":0},
            {"sha":"3","filename":"old.rs","status":"removed","patch":"@@ -1 +0,0 @@\n-a"},
            {"sha":"4","filename":"x.bin","status":"modified","patch":"Binary files a/x.bin and b/x.bin differ"},
            {"sha":"5","filename":"weird","status":"something-new","patch":"@@ -1 +1 @@\n+z"}
        ]"#;
        let files: Vec<ChangedFile> = serde_json::from_str(raw).unwrap();
        assert_eq!(files.len(), 5);
        assert!(files[0].reviewable_patch().is_ok());
        assert_eq!(files[1].reviewable_patch(), Err(SkipReason::NoPatch));
        assert_eq!(files[2].reviewable_patch(), Err(SkipReason::Removed));
        assert_eq!(files[3].reviewable_patch(), Err(SkipReason::Binary));
        assert_eq!(files[4].status, FileStatus::Unknown);
        assert!(files[4].reviewable_patch().is_ok());
    }

    #[test]
    fn pull_request_exposes_head_sha() {
        let raw = r#"{"number":7,"title":"t","state":"open",
            "head":{"sha":"abc123","ref":"feature"},"base":{"sha":"def456","ref":"main"}}"#;
        let pr: PullRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(pr.head_sha(), "abc123");
        assert_eq!(pr.base.name.as_deref(), Some("main"));
    }

    #[test]
    fn new_comment_serializes_line_semantics() {
        let c = NewReviewComment {
            body: "b",
            path: "p.rs",
            line: 12,
            side: DiffSide::Right,
            commit_id: "abc",
        };
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["line"], 12);
        assert_eq!(v["side"], "RIGHT");
        assert_eq!(v["commit_id"], "abc");
        assert!(v.get("position").is_none());
    }
}
