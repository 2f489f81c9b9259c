//! Public entry for the pr-reviewer pipeline.
//!
//! One run reviews one pull request, sequentially:
//!
//! 1) **Provider I/O**
//!    - Fetch PR metadata to get the head commit SHA (fatal on failure)
//!    - List changed files with their patches (fatal on failure)
//!    - Load markers of already-posted comments (best-effort)
//!
//! 2) **Per file** (files without a reviewable patch are skipped)
//!    - Build the fixed review prompt around the raw patch
//!    - Call the configured text-generation backend (OpenAI or Gemini)
//!    - Extract `Line N: …` candidates from the reply
//!
//! 3) **Per comment** (failures are logged and isolated)
//!    - Validate the line against the file's diff
//!    - Post it as an inline review comment (or log it in dry-run)
//!
//! The pipeline uses `tracing` for logging and plain `async fn` with
//! enum-dispatch over the LLM backends.

pub mod config;
pub mod errors;
pub mod git_providers;
pub mod parser; // diff line mapping
pub mod publish;
pub mod review; // prompt, extraction, validation

use std::time::Instant;

use ai_llm_service::LlmService;
use tracing::{debug, info, warn};

pub use config::ReviewConfig;
use errors::{Error, ReviewResult};
use git_providers::GitHubClient;
use parser::compute_diff_lines;
use publish::{PublishOutcome, Publisher};
use review::{build_review_prompt, extract_comments, validate_with};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub files_total: usize,
    pub files_reviewed: usize,
    pub files_skipped: usize,
    pub candidates: usize,
    pub posted: usize,
    pub dry_run: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl ReviewSummary {
    /// Records the outcome of one comment attempt.
    fn record(&mut self, outcome: &ReviewResult<PublishOutcome>) {
        match outcome {
            Ok(PublishOutcome::Posted { .. }) => self.posted += 1,
            Ok(PublishOutcome::DryRun) => self.dry_run += 1,
            Ok(PublishOutcome::Duplicate) => self.duplicates += 1,
            Err(Error::Rejected(_)) => self.rejected += 1,
            Err(_) => self.failed += 1,
        }
    }
}

/// Runs the whole review for the pull request described by `cfg`.
///
/// # Errors
/// Configuration problems, PR metadata / file listing failures and
/// text-generation failures abort the run. Per-comment validation and
/// posting failures do not; they are counted in the returned summary.
pub async fn run_review(cfg: ReviewConfig) -> ReviewResult<ReviewSummary> {
    let t0 = Instant::now();
    let id = &cfg.pr;

    let github = GitHubClient::new(&cfg.github)?;
    let llm = LlmService::from_config(cfg.llm.clone())?;

    info!(
        "review start: pr={} provider={} model={} dry_run={}",
        id,
        llm.provider(),
        cfg.llm.model,
        cfg.publish.dry_run
    );

    let pr = github.get_pull_request(id).await?;
    debug!("pr meta ok: head_sha={} state={}", pr.head_sha(), pr.state);

    let files = github.list_changed_files(id).await?;
    info!("changed files: {}", files.len());

    let mut publisher = Publisher::new(&github, id, pr.head_sha(), cfg.publish.clone());
    publisher.load_existing_markers().await;

    let mut summary = ReviewSummary {
        files_total: files.len(),
        ..Default::default()
    };

    for file in &files {
        let patch = match file.reviewable_patch() {
            Ok(p) => p,
            Err(reason) => {
                debug!("skip {}: {:?}", file.filename, reason);
                summary.files_skipped += 1;
                continue;
            }
        };

        let t_file = Instant::now();
        let prompt = build_review_prompt(&file.filename, patch);
        let reply = llm.generate(&prompt).await?;
        debug!("{}: model reply ({} chars)", file.filename, reply.len());

        let candidates = extract_comments(&reply, &file.filename);
        let diff_lines = compute_diff_lines(patch);
        debug!(
            "{}: candidates={} diff_lines={}",
            file.filename,
            candidates.len(),
            diff_lines.len()
        );
        summary.candidates += candidates.len();

        for candidate in candidates {
            let outcome = match validate_with(candidate, &diff_lines) {
                Ok(valid) => publisher.publish(&valid).await,
                Err(rejection) => Err(rejection.into()),
            };
            if let Err(e) = &outcome {
                warn!("failed to add comment on {}: {}", file.filename, e);
            }
            summary.record(&outcome);
        }

        summary.files_reviewed += 1;
        debug!(
            "{}: done in {} ms",
            file.filename,
            t_file.elapsed().as_millis()
        );
    }

    info!(
        "review done: files={} reviewed={} skipped={} candidates={} posted={} dry_run={} duplicates={} rejected={} failed={} in {} ms",
        summary.files_total,
        summary.files_reviewed,
        summary.files_skipped,
        summary.candidates,
        summary.posted,
        summary.dry_run,
        summary.duplicates,
        summary.rejected,
        summary.failed,
        t0.elapsed().as_millis()
    );

    Ok(summary)
}

// -----------------------------------------------------------------------------
// Convenience re-exports for downstream users
// -----------------------------------------------------------------------------

pub use parser::DiffLineSet;
pub use review::{ReviewCommentCandidate, ValidatedComment};
