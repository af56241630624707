//! Plain-text excerpts generated from a markdown body

use lazy_static::lazy_static;
use regex::Regex;

/// Default excerpt length, in characters
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

const ELLIPSIS: &str = "...";

lazy_static! {
    static ref CODE_BLOCK: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    static ref HEADING: Regex = Regex::new(r"(?m)^[ \t]*#{1,6}[ \t]+.*$").unwrap();
    static ref BOLD: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref ITALIC: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref INLINE_CODE: Regex = Regex::new(r"`(.*?)`").unwrap();
    static ref LINK: Regex = Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap();
}

/// Strip markdown syntax from `body`, keeping readable text.
///
/// Fenced code blocks and heading lines are removed outright; emphasis,
/// inline code and links keep their inner text. A removed heading leaves an
/// empty line behind, so a heading inside a paragraph splits it in two.
pub fn strip_markdown(body: &str) -> String {
    let text = CODE_BLOCK.replace_all(body, "");
    let text = HEADING.replace_all(&text, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_CODE.replace_all(&text, "$1");
    let text = LINK.replace_all(&text, "$1");
    text.trim().to_string()
}

/// Generate an excerpt: the first paragraph of the stripped body, cut to
/// `max_chars` characters with a trailing ellipsis when longer.
pub fn generate_excerpt(body: &str, max_chars: usize) -> String {
    let plain = strip_markdown(&body.replace("\r\n", "\n"));
    let first = plain.split("\n\n").next().unwrap_or_default();
    truncate_chars(first, max_chars)
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &s[..cut], ELLIPSIS),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_and_bold_stripped() {
        let excerpt = generate_excerpt("# Title\n\nSome **bold** text.", DEFAULT_EXCERPT_LENGTH);
        assert_eq!(excerpt, "Some bold text.");
    }

    #[test]
    fn test_first_paragraph_only() {
        let body = "First paragraph\nstill first.\n\nSecond paragraph.";
        assert_eq!(
            generate_excerpt(body, DEFAULT_EXCERPT_LENGTH),
            "First paragraph\nstill first."
        );
    }

    #[test]
    fn test_inline_markup_keeps_text() {
        let body = "Use `cargo` with *care* and read [the book](https://doc.rust-lang.org/book/).";
        assert_eq!(
            generate_excerpt(body, DEFAULT_EXCERPT_LENGTH),
            "Use cargo with care and read the book."
        );
    }

    #[test]
    fn test_code_block_removed_before_other_markup() {
        let body = "```rust\n// **not bold**\nfn main() {}\n```\n\nAfter the code.";
        assert_eq!(generate_excerpt(body, DEFAULT_EXCERPT_LENGTH), "After the code.");
    }

    #[test]
    fn test_truncated_with_ellipsis() {
        let body = "a".repeat(200);
        let excerpt = generate_excerpt(&body, DEFAULT_EXCERPT_LENGTH);
        assert_eq!(excerpt.len(), 153);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_exact_length_not_truncated() {
        let body = "b".repeat(150);
        assert_eq!(generate_excerpt(&body, DEFAULT_EXCERPT_LENGTH), body);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let body = "é".repeat(10);
        assert_eq!(generate_excerpt(&body, 4), "éééé...");
    }

    #[test]
    fn test_crlf_paragraphs() {
        assert_eq!(generate_excerpt("One.\r\n\r\nTwo.", 150), "One.");
    }

    #[test]
    fn test_heading_inside_paragraph_splits_it() {
        assert_eq!(
            generate_excerpt("Before\n## Section\nAfter", DEFAULT_EXCERPT_LENGTH),
            "Before"
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(generate_excerpt("", 150), "");
        assert_eq!(generate_excerpt("## Only a heading", 150), "");
    }
}
