//! Hashtag extraction from document content.
//!
//! # Responsibility
//! - Scan markdown content line by line and collect hashtag tokens.
//! - Suppress extraction inside fenced code blocks.
//!
//! # Invariants
//! - Every returned token starts with `#`, is 2..=21 chars long, and its
//!   second char is not `#` (headings like `## Title` never qualify).
//! - First occurrence wins; the output contains no duplicates.
//! - Lines inside a fence contribute nothing, even if they look like tags.

use std::collections::HashSet;

/// Minimum tag token length, leading `#` included.
pub const TAG_MIN_CHARS: usize = 2;
/// Maximum tag token length, leading `#` included.
pub const TAG_MAX_CHARS: usize = 21;

/// Extracts hashtag tokens from document content in first-occurrence order.
///
/// Fence state is tracked per line: a line starting with three backticks or
/// three tildes toggles it, and toggle lines themselves are skipped. Only
/// block fences are tracked; a tag inside single-backtick inline code is
/// still extracted.
pub fn extract_tags(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    let mut in_fence = false;

    for line in content.lines() {
        if line.starts_with("```") || line.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        for token in line.split_whitespace() {
            if is_tag_token(token) && seen.insert(token) {
                tags.push(token.to_string());
            }
        }
    }

    tags
}

/// Returns whether one whitespace-delimited token qualifies as a tag.
///
/// Length is measured in Unicode scalar values.
pub fn is_tag_token(token: &str) -> bool {
    let length = token.chars().count();
    if !(TAG_MIN_CHARS..=TAG_MAX_CHARS).contains(&length) {
        return false;
    }
    let mut chars = token.chars();
    chars.next() == Some('#') && chars.next() != Some('#')
}

#[cfg(test)]
mod tests {
    use super::{extract_tags, is_tag_token, TAG_MAX_CHARS};

    #[test]
    fn empty_content_yields_no_tags() {
        assert!(extract_tags("").is_empty());
    }

    #[test]
    fn tokens_keep_leading_hash_and_first_occurrence_order() {
        let tags = extract_tags("#beta text #alpha more #beta");
        assert_eq!(tags, vec!["#beta".to_string(), "#alpha".to_string()]);
    }

    #[test]
    fn heading_markers_are_not_tags() {
        assert!(extract_tags("## Title\n### Subtitle").is_empty());
    }

    #[test]
    fn bare_hash_is_too_short() {
        assert!(!is_tag_token("#"));
    }

    #[test]
    fn length_limit_counts_chars_not_bytes() {
        let at_limit: String = std::iter::once('#')
            .chain(std::iter::repeat('é').take(TAG_MAX_CHARS - 1))
            .collect();
        assert!(is_tag_token(&at_limit));
        assert!(!is_tag_token(&format!("{at_limit}é")));
    }

    #[test]
    fn fenced_lines_are_skipped_including_the_fence_itself() {
        let content = "#kept\n``` #onfence\n#inside\n```\n#after";
        assert_eq!(
            extract_tags(content),
            vec!["#kept".to_string(), "#after".to_string()]
        );
    }

    #[test]
    fn tilde_fences_toggle_like_backtick_fences() {
        let content = "~~~\n#hidden\n~~~\n#visible";
        assert_eq!(extract_tags(content), vec!["#visible".to_string()]);
    }

    #[test]
    fn inline_code_does_not_suppress_extraction() {
        let tags = extract_tags("before `see #inline here` after");
        assert_eq!(tags, vec!["#inline".to_string()]);
    }

    #[test]
    fn tags_never_merge_across_lines() {
        let tags = extract_tags("#sp\nlit");
        assert_eq!(tags, vec!["#sp".to_string()]);
    }
}
