//! String and naming utilities for code generation

use once_cell::sync::Lazy;
use regex::Regex;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\w*\}").expect("valid placeholder regex"));
static MODULE_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"angular\.module\(.*\)").expect("valid module regex"));

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase();
        } else {
            // Word separators (spaces, dashes, underscores, punctuation)
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Convert a string to camelCase, or PascalCase when `starts_capital` is true
pub fn to_camel_case(s: &str, starts_capital: bool) -> String {
    let snake = to_snake_case(s);
    let mut result = String::new();

    for (i, word) in snake.split('_').filter(|w| !w.is_empty()).enumerate() {
        let mut chars = word.chars();
        match chars.next() {
            None => {}
            Some(first) if i == 0 && !starts_capital => {
                result.extend(first.to_lowercase());
                result.push_str(chars.as_str());
            }
            Some(first) => {
                result.extend(first.to_uppercase());
                result.push_str(chars.as_str());
            }
        }
    }

    result
}

/// Convert a string to dash-separated form, used for generated file names
pub fn dasherize(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}

/// Reduce an English plural word to its singular form.
///
/// Covers the pluralization rules used for REST collection segments:
/// `companies` -> `company`, `statuses` -> `status`, `posts` -> `post`.
/// Words that are not recognisably plural are returned unchanged.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();

    if lower.ends_with("ies") && word.len() > 3 {
        return format!("{}y", &word[..word.len() - 3]);
    }

    for suffix in ["ses", "xes", "zes", "shes", "ches"] {
        if lower.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }

    if lower.ends_with("ss") || !lower.ends_with('s') {
        return word.to_string();
    }

    word[..word.len() - 1].to_string()
}

/// Strip `{param}` placeholder tokens from a name and camel-case the rest.
///
/// Returns `None` when nothing usable remains.
pub fn clean_display_name(name: &str) -> Option<String> {
    let cleaned = PLACEHOLDER_RE.replace_all(name, "");
    let camel = to_camel_case(&cleaned, false);
    if camel.is_empty() { None } else { Some(camel) }
}

/// Derive a sub-object name from a relative URI.
///
/// Slashes become word breaks and placeholder tokens are stripped, so
/// `/user-accounts/{id}` resolves to `userAccounts`. Returns `None` when the
/// URI consists only of separators and placeholders.
pub fn clean_sub_method_name(uri: &str) -> Option<String> {
    let dashed = uri.replace('/', "-");
    let cleaned = PLACEHOLDER_RE.replace_all(&dashed, "");
    let camel = to_camel_case(&cleaned, false);
    if camel.is_empty() { None } else { Some(camel) }
}

/// Returns a string of `amount` spaces
pub fn get_indent(amount: usize) -> String {
    " ".repeat(amount)
}

/// Indent every line of `text` by `amount` spaces
pub fn indent_text(amount: usize, text: &str) -> String {
    let indent = get_indent(amount);
    text.lines()
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove the leading `angular.module(...)` declaration from a rendered
/// fragment so it chains onto a previous fragment in one-file output.
pub fn strip_module_declaration(text: &str) -> String {
    MODULE_DECL_RE.replace(text, "").into_owned()
}
