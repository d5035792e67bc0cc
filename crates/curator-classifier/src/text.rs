//! Plain-text extraction from Markdown/HTML documents
//!
//! Exported articles arrive as Markdown with embedded HTML. The classifier
//! only needs the words, so markup is removed and all whitespace (paragraph
//! breaks included) collapses to single spaces.

use pulldown_cmark::{html, Options, Parser};
use scraper::{Html, Node};

/// Elements whose text never reaches the classifier
const HIDDEN: [&str; 3] = ["script", "style", "noscript"];

/// Elements that separate words even when the source has no whitespace
const BLOCKS: [&str; 24] = [
    "address", "article", "blockquote", "br", "dd", "div", "dt", "footer", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "li", "p", "pre", "section", "table", "td", "th", "tr",
];

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

fn is_hidden(name: &str) -> bool {
    HIDDEN.contains(&name)
}

/// Convert marked-up content to normalized plain text
///
/// The Markdown is rendered to HTML first, then only the visible text nodes
/// of the parsed document are kept: attributes, comments and script or style
/// bodies are dropped and entities come out decoded. Never fails; content
/// with no visible text yields an empty string.
///
/// ```
/// use curator_classifier::text::extract_text;
///
/// let md = "# 标题\n\n正文 **重点** 与 [链接](https://example.com)。\n\n![图](a.png)";
/// assert_eq!(extract_text(md), "标题 正文 重点 与 链接。");
/// ```
pub fn extract_text(raw: &str) -> String {
    let markdown = raw.trim_start_matches('\u{feff}');

    let mut rendered = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut rendered, Parser::new_ext(markdown, markdown_options()));

    let document = Html::parse_fragment(&rendered);
    let mut text = String::with_capacity(rendered.len());
    for node in document.root_element().descendants() {
        match node.value() {
            Node::Text(chunk) => {
                let hidden = node.ancestors().any(|ancestor| {
                    matches!(ancestor.value(), Node::Element(element) if is_hidden(element.name()))
                });
                if !hidden {
                    text.push_str(chunk);
                }
            }
            Node::Element(element) if BLOCKS.contains(&element.name()) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`extract_text`], for raw file bytes
///
/// Bytes that are not valid UTF-8 count as unreadable and yield an empty string.
pub fn extract_text_from_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(raw) => extract_text(raw),
        Err(_) => String::new(),
    }
}
