//! Documentation formatting for generated code.
//!
//! RAML descriptions are free markdown-ish text. This module flattens them
//! into plain text, soft-wraps them, and optionally renders them as a JSDoc
//! comment block for embedding above generated methods and factories.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

/// Maximum line width for wrapped description text
const WRAP_WIDTH: usize = 110;

/// Formats a RAML description into javascript documentation.
///
/// When `as_comment` is true the wrapped text is returned as a JSDoc block:
///
/// ```text
/// /**
///  * This is the comment format.
///  */
/// ```
///
/// An empty or whitespace-only description yields an empty string.
pub fn format_description(description: &str, as_comment: bool) -> String {
    let cleaned = decode_entities(&strip_all_html(description));
    let words: Vec<&str> = cleaned.split_whitespace().collect();

    if words.is_empty() {
        return String::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in words {
        if !current.is_empty() && current.len() + 1 + word.len() > WRAP_WIDTH {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    lines.push(current);

    if as_comment {
        let body = lines
            .iter()
            .map(|line| format!(" * {}", line))
            .collect::<Vec<_>>()
            .join("\n");
        format!("/**\n{}\n */", body)
    } else {
        lines.join("\n")
    }
}

/// Removes any HTML tags from the provided string
pub fn strip_all_html(s: &str) -> String {
    HTML_TAG_RE.replace_all(s, "").into_owned()
}

/// Decode the HTML entities commonly left behind by markdown renderers
fn decode_entities(s: &str) -> String {
    s.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
