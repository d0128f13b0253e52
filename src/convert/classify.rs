use std::sync::OnceLock;

use regex_lite::Regex;

/// What kind of location a URL-like attribute value points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Same-page anchors and boolean attribute values.
    Ignored,
    /// Anything carrying a URL scheme (`https:`, `mailto:`, `tel:` ...).
    External,
    /// Root-relative (`/about.html`) or drive-qualified (`C:\site\a.png`).
    Absolute,
    /// Relative to the current page (`img/logo.png`).
    Relative,
    /// Empty or whitespace-only values.
    Malformed,
}

impl PathKind {
    /// Whether the value points outside the site. Everything else is rewritten.
    pub fn is_external(self) -> bool {
        self == PathKind::External
    }
}

fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Two or more characters, so a drive letter like `C:` is not a scheme.
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]+:").expect("valid regex"))
}

fn absolute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([/\\]|[A-Za-z]:)").expect("valid regex"))
}

/// Classify a raw `href`/`src` value.
pub fn classify(path: &str) -> PathKind {
    if path.starts_with('#') || path == "true" || path == "false" {
        return PathKind::Ignored;
    }
    if path.trim().is_empty() {
        return PathKind::Malformed;
    }
    if scheme_re().is_match(path) {
        return PathKind::External;
    }
    if absolute_re().is_match(path) {
        PathKind::Absolute
    } else {
        PathKind::Relative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#x", PathKind::Ignored)]
    #[case("#", PathKind::Ignored)]
    #[case("true", PathKind::Ignored)]
    #[case("false", PathKind::Ignored)]
    #[case("http://a/b", PathKind::External)]
    #[case("https://example.com/x.html", PathKind::External)]
    #[case("mailto:someone@example.com", PathKind::External)]
    #[case("tel:+15550100", PathKind::External)]
    #[case("//cdn.example.com/lib.js", PathKind::Absolute)]
    #[case("/a/b", PathKind::Absolute)]
    #[case("/", PathKind::Absolute)]
    #[case(r"C:\site\logo.png", PathKind::Absolute)]
    #[case("C:/site/logo.png", PathKind::Absolute)]
    #[case("a/b", PathKind::Relative)]
    #[case("../about.html", PathKind::Relative)]
    #[case("logo.png", PathKind::Relative)]
    #[case("True", PathKind::Relative)]
    #[case("", PathKind::Malformed)]
    #[case("   ", PathKind::Malformed)]
    fn classifies(#[case] input: &str, #[case] expected: PathKind) {
        assert_eq!(classify(input), expected);
    }

    #[test]
    fn classification_is_stable() {
        for input in ["#top", "http://a/b", "/a", "a", ""] {
            assert_eq!(classify(input), classify(input));
        }
    }

    #[test]
    fn only_schemes_are_external() {
        assert!(PathKind::External.is_external());
        assert!(!PathKind::Absolute.is_external());
        assert!(!PathKind::Relative.is_external());
        assert!(!PathKind::Ignored.is_external());
        assert!(!PathKind::Malformed.is_external());
    }
}
