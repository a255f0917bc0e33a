//! String sanitization for names and free text.
//!
//! The name sanitizers are idempotent: running one on its own output returns
//! the same string.

use std::sync::LazyLock;

use regex::Regex;

use crate::validation::effect::is_effect_name_char;
use crate::validation::file::is_file_name_char;
use crate::validation::region::{is_region_name_char, MAX_LABEL_LEN};

/// Maximum length of sanitized free text, in characters.
pub const MAX_INPUT_LEN: usize = 1000;

static JAVASCRIPT_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("valid javascript: pattern"));

static EVENT_HANDLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on[a-z0-9_]+=").expect("valid event handler pattern"));

/// Normalize a file name to `[a-z0-9._-]`.
///
/// Steps run in this order: replace disallowed characters with `_`, collapse
/// `_` runs, strip one leading and one trailing `_`, lower-case.
pub fn sanitize_file_name(name: &str) -> String {
    let mut collapsed = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if is_file_name_char(c) { c } else { '_' };
        if c == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(c);
    }

    let trimmed = collapsed.strip_prefix('_').unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix('_').unwrap_or(trimmed);
    trimmed.to_ascii_lowercase()
}

/// Normalize a region label to `[A-Za-z0-9 -()]`, at most 50 characters.
pub fn sanitize_region_name(name: &str) -> String {
    sanitize_label(name, is_region_name_char)
}

/// Normalize an effect label to `[A-Za-z0-9 -]`, at most 50 characters.
pub fn sanitize_effect_name(name: &str) -> String {
    sanitize_label(name, is_effect_name_char)
}

// Trimming is repeated after filtering and truncation; dropped characters and
// the cut can both expose edge spaces.
fn sanitize_label(name: &str, keep: fn(char) -> bool) -> String {
    let filtered: String = name.trim().chars().filter(|&c| keep(c)).collect();
    let collapsed = collapse_spaces(filtered.trim());
    let truncated: String = collapsed.chars().take(MAX_LABEL_LEN).collect();
    truncated.trim_end().to_string()
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Strip markup and script vectors from free-form text.
pub fn sanitize_input(text: &str) -> String {
    let stripped: String = text.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect();
    let stripped = JAVASCRIPT_URI.replace_all(&stripped, "");
    let stripped = EVENT_HANDLER.replace_all(&stripped, "");
    stripped.chars().take(MAX_INPUT_LEN).collect()
}
