use std::path::Path;

use similar::TextDiff;

use crate::convert::document::transform_markup;
use crate::error::{FlaskifyError, Result};

/// Unified diff between two versions of a file.
pub fn unified_diff(old: &str, new: &str, path: &Path) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut output = String::new();

    output.push_str(&format!(
        "--- a/{}\n+++ b/{}\n",
        path.display(),
        path.display()
    ));

    for hunk in diff.unified_diff().context_radius(3).iter_hunks() {
        output.push_str(&format!("{hunk}"));
    }

    output
}

/// What converting the page at `path` would change, without touching it.
pub fn preview_page(path: &Path) -> Result<String> {
    let markup = std::fs::read_to_string(path).map_err(|e| FlaskifyError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;
    let converted = transform_markup(&markup);
    Ok(unified_diff(&markup, &converted, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_shows_changed_lines() {
        let diff = unified_diff("a\nb\n", "a\nc\n", Path::new("page.html"));
        assert!(diff.starts_with("--- a/page.html\n+++ b/page.html\n"));
        assert!(diff.contains("-b\n"));
        assert!(diff.contains("+c\n"));
    }

    #[test]
    fn preview_leaves_page_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("about.html");
        let original = "<p><a href=\"index.html\">Home</a></p>\n";
        std::fs::write(&path, original).unwrap();

        let diff = preview_page(&path).unwrap();

        assert!(diff.contains("{{ url_for('index') }}"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }
}
