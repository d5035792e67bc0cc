//! Model answer normalization

use curator_domain::{CategorySet, Verdict};
use regex::Regex;
use std::sync::OnceLock;

fn think_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"))
}

/// Remove every `<think>…</think>` block and trim the remainder
pub fn strip_think_blocks(raw: &str) -> String {
    think_block().replace_all(raw, "").trim().to_string()
}

/// Map a raw model answer onto the category set
///
/// Only an exact category name (after think-block removal and trimming)
/// yields [`Verdict::Category`]. Everything else, the irrelevant label
/// included, is [`Verdict::Irrelevant`].
pub fn normalize_response(raw: &str, categories: &CategorySet) -> Verdict {
    let cleaned = strip_think_blocks(raw);
    match categories.resolve(&cleaned) {
        Some(name) => Verdict::Category(name.to_string()),
        None => Verdict::Irrelevant,
    }
}
