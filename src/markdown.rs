//! Markdown detection and flattening.
//!
//! Synthesis input is occasionally markdown (chat transcripts, scraped
//! docs). Reading `**bold**` or `[link](url)` aloud verbatim is noise, so
//! text that matches any of a fixed pattern set is flattened to plain text.
//! Anything else passes through untouched — the detection patterns are the
//! contract, not a full markdown sniffer.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use regex::Regex;

static MARKDOWN_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?m)(^|\s)#[^#]",          // heading
        r"\*\*.*?\*\*",              // bold
        r"\*.*?\*",                  // italic
        r"!\[.*?\]\(.*?\)",          // image
        r"\[.*?\]\(.*?\)",           // link
        r"`[^`]+`",                  // inline code
        r"```[\s\S]*?```",           // fenced code
        r"(?m)(^|\s)\* ",            // unordered list
        r"(?m)(^|\s)\d+\. ",         // ordered list
        r"(?m)(^|\s)> ",             // blockquote
        r"(?m)(^|\s)---",            // horizontal rule
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Does the text match any of the fixed markdown patterns?
pub fn is_markdown(text: &str) -> bool {
    MARKDOWN_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Flatten markdown to plain text: keep text and code content, drop image
/// alt text and link targets, newline between blocks.
pub fn markdown_to_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Image alt text is not spoken; track nesting so nothing inside leaks.
    let mut image_depth = 0usize;
    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::Image { .. }) => image_depth += 1,
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            _ if image_depth > 0 => {}
            Event::Text(t) | Event::Code(t) => out.push_str(&t),
            Event::SoftBreak | Event::HardBreak => out.push('\n'),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::BlockQuote(_),
            ) => out.push('\n'),
            _ => {}
        }
    }
    out.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The stage entry point: flatten only when the text looks like markdown.
pub fn flatten_if_markdown(text: &str) -> String {
    if is_markdown(text) {
        markdown_to_text(text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_common_markdown() {
        assert!(is_markdown("# Title"));
        assert!(is_markdown("some **bold** text"));
        assert!(is_markdown("an ![img](a.png) here"));
        assert!(is_markdown("a [link](https://example.com)"));
        assert!(is_markdown("run `cargo test` now"));
        assert!(is_markdown("```\ncode\n```"));
        assert!(is_markdown("* item one\n* item two"));
        assert!(is_markdown("1. first\n2. second"));
        assert!(is_markdown("> quoted"));
        assert!(is_markdown("above\n---\nbelow"));
    }

    #[test]
    fn test_plain_text_is_not_markdown() {
        assert!(!is_markdown("Just a plain sentence."));
        assert!(!is_markdown("这是一个普通句子。"));
        let plain = "No markers here, 3 + 4 = 7.";
        assert_eq!(flatten_if_markdown(plain), plain);
    }

    #[test]
    fn test_flattens_emphasis_and_headings() {
        let out = flatten_if_markdown("# Title\n\nSome **bold** and *italic* text.");
        assert_eq!(out, "Title\nSome bold and italic text.");
    }

    #[test]
    fn test_drops_link_targets_keeps_label() {
        let out = flatten_if_markdown("See [the docs](https://example.com) first.");
        assert!(out.contains("the docs"), "got: {}", out);
        assert!(!out.contains("example.com"), "got: {}", out);
    }

    #[test]
    fn test_drops_image_alt_text() {
        let out = flatten_if_markdown("before ![a cat photo](cat.png) after");
        assert!(!out.contains("a cat photo"), "got: {}", out);
        assert!(!out.contains("cat.png"), "got: {}", out);
        assert!(out.contains("before"), "got: {}", out);
        assert!(out.contains("after"), "got: {}", out);
    }

    #[test]
    fn test_keeps_code_content() {
        let out = flatten_if_markdown("run `cargo test` now");
        assert_eq!(out, "run cargo test now");
    }

    #[test]
    fn test_malformed_markdown_never_panics() {
        // Unclosed fences, stray brackets: parser is lenient by design.
        let out = flatten_if_markdown("```rust\nfn main( **[ !(");
        assert!(!out.is_empty());
    }
}
