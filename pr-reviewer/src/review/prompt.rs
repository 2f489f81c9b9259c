//! Prompt builder for the per-file review request.

/// Fixed instruction placed in front of every patch.
const REVIEW_INSTRUCTION: &str = "Please perform a code review for the following changes. \
Highlight potential issues, suggest improvements, and identify any best practices violations:";

/// Output contract appended so both backends answer in a parseable shape.
const OUTPUT_CONTRACT: &str = "Reference each finding by the new-file line number it applies to, \
one finding per line, using the format `Line <number>: <comment>`.";

/// Builds the review prompt for one file's patch.
pub fn build_review_prompt(path: &str, patch: &str) -> String {
    let mut s = String::with_capacity(patch.len() + 512);
    s.push_str(REVIEW_INSTRUCTION);
    s.push_str("\n\n");
    s.push_str(OUTPUT_CONTRACT);
    s.push_str("\n\nFile: ");
    s.push_str(path);
    s.push_str("\n\n");
    s.push_str(patch);
    s
}
