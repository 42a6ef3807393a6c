//! Flatten the HTML-ish markup sheet authors put in `description` cells into
//! plain text lines the terminal can show.

use regex::Regex;
use std::sync::LazyLock;

static BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</p\s*>|</li\s*>|</h[1-6]\s*>").expect("break pattern")
});
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Convert markup to plain text: line-breaking tags become newlines, other
/// tags are dropped and the common entities are decoded.
pub fn to_plain_text(markup: &str) -> String {
    let text = BREAK.replace_all(markup, "\n");
    let text = TAG.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
