//! Extracts `(path, line, body)` candidates from free-text model output.
//!
//! Matching is line-oriented against an ordered [`PatternSet`]. The first
//! pattern that matches a line decides it: either a candidate is emitted or,
//! when the line carries one of the pattern's suppression markers, the line
//! is dropped. Lines matching no pattern are skipped.
//!
//! A match whose body is blank after trimming (`Line 5:   `) yields no
//! candidate.

use std::sync::OnceLock;

use regex::Regex;

use crate::review::ReviewCommentCandidate;

/// One recognized "this line names a target line and a body" shape.
///
/// The regex must expose the line number as capture group 1 and the body as
/// capture group 2.
#[derive(Debug, Clone)]
pub struct CommentPattern {
    pub name: &'static str,
    pub regex: Regex,
    /// Lines containing any of these literals are suppressed.
    pub suppress_if_contains: Vec<&'static str>,
}

/// Ordered list of patterns; earlier entries win.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<CommentPattern>,
}

impl PatternSet {
    pub fn new(patterns: Vec<CommentPattern>) -> Self {
        Self { patterns }
    }

    /// Built-in formats, both matched anywhere on the line:
    /// 1. `* Line N: text` (bulleted, also nested or quoted); lines mentioning
    ///    `Suggested Improvements:` are dropped;
    /// 2. `Line N: text`.
    pub fn builtin() -> &'static PatternSet {
        static BUILTIN: OnceLock<PatternSet> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            PatternSet::new(vec![
                CommentPattern {
                    name: "bulleted",
                    regex: Regex::new(r"\* Line (\d+): (.+)").expect("valid bullet regex"),
                    suppress_if_contains: vec!["Suggested Improvements:"],
                },
                CommentPattern {
                    name: "plain",
                    regex: Regex::new(r"Line (\d+): (.+)").expect("valid plain regex"),
                    suppress_if_contains: Vec::new(),
                },
            ])
        })
    }

    /// Applies the set to a single line of model output.
    fn match_line<'a>(&self, line: &'a str) -> LineMatch<'a> {
        for p in &self.patterns {
            let Some(caps) = p.regex.captures(line) else {
                continue;
            };
            if p.suppress_if_contains.iter().any(|m| line.contains(m)) {
                return LineMatch::Suppressed;
            }
            let number = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            let body = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            return match number {
                Some(n) if !body.is_empty() => LineMatch::Comment { line: n, body },
                _ => LineMatch::Suppressed,
            };
        }
        LineMatch::None
    }
}

enum LineMatch<'a> {
    Comment { line: u32, body: &'a str },
    Suppressed,
    None,
}

/// Extracts candidates using the built-in patterns.
pub fn extract_comments(model_output: &str, path: &str) -> Vec<ReviewCommentCandidate> {
    extract_comments_with(PatternSet::builtin(), model_output, path)
}

/// Extracts candidates using a caller-supplied pattern set.
pub fn extract_comments_with(
    patterns: &PatternSet,
    model_output: &str,
    path: &str,
) -> Vec<ReviewCommentCandidate> {
    model_output
        .lines()
        .filter_map(|line| match patterns.match_line(line) {
            LineMatch::Comment { line, body } => Some(ReviewCommentCandidate {
                path: path.to_string(),
                line,
                body: body.to_string(),
            }),
            LineMatch::Suppressed | LineMatch::None => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(path: &str, line: u32, body: &str) -> ReviewCommentCandidate {
        ReviewCommentCandidate {
            path: path.into(),
            line,
            body: body.into(),
        }
    }

    #[test]
    fn parses_plain_lines() {
        let response = "\n      Line 10: This is a comment.\n      Line 20: Another comment.\n    ";
        let comments = extract_comments(response, "test.js");
        assert_eq!(
            comments,
            vec![
                cand("test.js", 10, "This is a comment."),
                cand("test.js", 20, "Another comment."),
            ]
        );
    }

    #[test]
    fn parses_bulleted_lines() {
        let response = "**Review**\n* Line 3: Use const here.\n  * Line 7: Missing error check. ";
        let comments = extract_comments(response, "src/app.ts");
        assert_eq!(
            comments,
            vec![
                cand("src/app.ts", 3, "Use const here."),
                cand("src/app.ts", 7, "Missing error check."),
            ]
        );
    }

    #[test]
    fn suggested_improvements_bullet_is_never_emitted() {
        let response = "* Line 5: Suggested Improvements: split this function\n* Line 6: ok";
        let comments = extract_comments(response, "a.rs");
        assert_eq!(comments, vec![cand("a.rs", 6, "ok")]);
    }

    #[test]
    fn nested_or_quoted_suggested_improvements_bullet_is_dropped() {
        let response = "> * Line 5: Suggested Improvements: split this\n\
                        1. * Line 6: Suggested Improvements: rename\n\
                        - * Line 7: real finding";
        let comments = extract_comments(response, "a.rs");
        assert_eq!(comments, vec![cand("a.rs", 7, "real finding")]);
    }

    #[test]
    fn suppressed_bullet_never_falls_back_to_plain_pattern() {
        let set = PatternSet::builtin();
        let line = "* Line 5: Suggested Improvements: split this";
        assert!(set.patterns[1].regex.is_match(line));
        assert!(matches!(set.match_line(line), LineMatch::Suppressed));
    }

    #[test]
    fn plain_line_with_suggested_improvements_is_kept() {
        let response = "Line 8: Suggested Improvements: extract a helper";
        assert_eq!(
            extract_comments(response, "a.rs"),
            vec![cand("a.rs", 8, "Suggested Improvements: extract a helper")]
        );
    }

    #[test]
    fn blank_body_is_skipped() {
        assert!(extract_comments("Line 5:    ", "a.rs").is_empty());
    }

    #[test]
    fn no_matches_yields_empty() {
        let response = "Looks good to me.\nNo issues found on line 4.";
        assert!(extract_comments(response, "a.rs").is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let response = "Line 1: a\nnoise\n* Line 2: b\nLine 3: c";
        let first = extract_comments(response, "f.py");
        let second = extract_comments(response, "f.py");
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn overflowing_line_number_is_skipped() {
        let response = "Line 99999999999: too big\nLine 2: fine";
        assert_eq!(extract_comments(response, "f"), vec![cand("f", 2, "fine")]);
    }

    #[test]
    fn custom_pattern_set() {
        let set = PatternSet::new(vec![CommentPattern {
            name: "colon-l",
            regex: Regex::new(r"^L(\d+)\s*-\s*(.+)$").unwrap(),
            suppress_if_contains: vec!["[skip]"],
        }]);
        let out = extract_comments_with(&set, "L4 - rename x\nL5 - [skip] meh\nLine 6: ignored", "m.go");
        assert_eq!(out, vec![cand("m.go", 4, "rename x")]);
    }
}
