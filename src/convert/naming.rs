//! Route and view-function names derived from page file names.
//!
//! A page stem can be anything a filesystem allows (`about-us`, `2024.news`,
//! `contact (old)`), but Flask endpoints double as Python function names, so the
//! stem is squeezed into `[A-Za-z_][A-Za-z0-9_]*`:
//!
//! - `my-page.name` -> `my_page_name`
//! - `123page` -> `_123page`
//! - `___x` -> `x`
//! - `/about` -> `about`
//!
//! Distinct stems may map to the same identifier (`a-b` and `a.b`); that is left
//! to the caller to report.

use std::sync::OnceLock;

use regex_lite::Regex;

fn invalid_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9A-Za-z_]+").expect("valid regex"))
}

/// Turn an arbitrary string into a valid identifier.
pub fn sanitize_identifier(raw: &str) -> String {
    let replaced = invalid_run_re().replace_all(raw, "_");
    let trimmed = replaced.trim_start_matches('_');

    if trimmed.is_empty() || trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{trimmed}")
    } else {
        trimmed.to_string()
    }
}
