//! Unified-diff helpers.
//!
//! Maps a per-file patch (as returned by the hosting API) to the set of
//! new-file line numbers that an inline review comment may target.
//!
//! Walk rules:
//! - `@@ … +c[,d] @@` resets the new-file counter to `c`;
//! - lines starting with `-` (removals) or `\` (`\ No newline at end of file`)
//!   take no new-file line number;
//! - every other line (context or addition) takes the current number and
//!   advances the counter by one.
//!
//! A hunk header without a recognizable `+c` leaves the counter where it is.

use std::sync::OnceLock;

use regex::Regex;

static NEW_START_RE: OnceLock<Regex> = OnceLock::new();

fn new_start_re() -> &'static Regex {
    NEW_START_RE.get_or_init(|| Regex::new(r"\+(\d+)(,\d+)?").expect("valid hunk header regex"))
}

/// New-file line numbers addressable by a review comment, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffLineSet {
    lines: Vec<u32>,
}

impl DiffLineSet {
    /// True if `line` was assigned to a context or added line.
    pub fn contains(&self, line: u32) -> bool {
        self.lines.contains(&line)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.lines
    }
}

impl FromIterator<u32> for DiffLineSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}

/// Computes the commentable new-file lines of `patch`.
///
/// Never fails: malformed input yields a partial or empty set.
pub fn compute_diff_lines(patch: &str) -> DiffLineSet {
    let mut lines = Vec::new();
    let mut current: u32 = 0;

    for line in patch.lines() {
        if line.starts_with("@@") {
            if let Some(start) = parse_new_start(line) {
                current = start;
            }
        } else if line.starts_with('-') || line.starts_with('\\') {
            continue;
        } else {
            lines.push(current);
            current = current.saturating_add(1);
        }
    }

    DiffLineSet { lines }
}

/// First `+N` (optionally `+N,M`) in a hunk header.
fn parse_new_start(header: &str) -> Option<u32> {
    new_start_re()
        .captures(header)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Simple heuristic to detect binary patches or messages in unified diff.
pub fn looks_like_binary_patch(s: &str) -> bool {
    s.contains("GIT binary patch")
        || s.starts_with("Binary files ")
        || (s.starts_with("Files ") && s.contains(" differ"))
}
