//! Cross-checks candidates against the diff.
//!
//! GitHub only accepts inline comments on lines that belong to the diff;
//! anything else is rejected here with a local error instead of a remote 422.

use thiserror::Error;

use crate::parser::{DiffLineSet, compute_diff_lines};
use crate::review::{ReviewCommentCandidate, ValidatedComment};

/// Candidate line is not part of the file's diff.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid line number {line} for {path}: line not part of diff")]
pub struct Rejection {
    pub path: String,
    pub line: u32,
}

/// Validates `candidate` against the raw `patch` of its file.
pub fn validate(
    candidate: ReviewCommentCandidate,
    patch: &str,
) -> Result<ValidatedComment, Rejection> {
    validate_with(candidate, &compute_diff_lines(patch))
}

/// Validates `candidate` against a precomputed [`DiffLineSet`].
pub fn validate_with(
    candidate: ReviewCommentCandidate,
    diff_lines: &DiffLineSet,
) -> Result<ValidatedComment, Rejection> {
    if diff_lines.contains(candidate.line) {
        Ok(ValidatedComment(candidate))
    } else {
        Err(Rejection {
            path: candidate.path,
            line: candidate.line,
        })
    }
}
