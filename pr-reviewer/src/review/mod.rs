//! Review core: prompt building, comment extraction and diff validation.
//!
//! Everything here is pure; I/O lives in `git_providers` and `publish`.

pub mod extract;
pub mod prompt;
pub mod validate;

use std::ops::Deref;

pub use extract::{CommentPattern, PatternSet, extract_comments, extract_comments_with};
pub use prompt::build_review_prompt;
pub use validate::{Rejection, validate, validate_with};

/// A comment suggested by the model, not yet checked against the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCommentCandidate {
    /// Repository-relative file path.
    pub path: String,
    /// New-file line number (1-based).
    pub line: u32,
    /// Trimmed comment text.
    pub body: String,
}

/// A candidate whose line is part of the diff. Only obtainable through
/// [`validate`] / [`validate_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedComment(ReviewCommentCandidate);

impl ValidatedComment {
    pub fn into_inner(self) -> ReviewCommentCandidate {
        self.0
    }
}

impl Deref for ValidatedComment {
    type Target = ReviewCommentCandidate;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
