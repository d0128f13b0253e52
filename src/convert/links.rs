use std::borrow::Cow;
use std::sync::OnceLock;

use kuchikiki::NodeRef;
use regex_lite::Regex;

use crate::convert::classify::classify;
use crate::convert::naming::sanitize_identifier;

/// `{{ url_for('<route>') }}`
pub fn route_lookup(route: &str) -> String {
    format!("{{{{ url_for('{route}') }}}}")
}

/// `{{ url_for('static', filename='<filename>') }}`
pub fn static_lookup(filename: &str) -> String {
    format!("{{{{ url_for('static', filename='{filename}') }}}}")
}

/// New value for an `href`, or `None` when it stays as is.
///
/// Links into other pages become route lookups; anything else without a URL
/// scheme (PDFs, stylesheets, the site root) becomes a static lookup.
/// Fragment-bearing links are left alone, including `page.html#section`.
pub fn rewrite_href(value: &str) -> Option<String> {
    if classify(value).is_external() || value.contains('#') {
        return None;
    }
    match value.strip_suffix(".html") {
        Some(page) => Some(route_lookup(&sanitize_identifier(page))),
        None => Some(static_lookup(value)),
    }
}

/// New value for a `src`, or `None` when it stays as is.
///
/// Values already holding a template expression are skipped, so running the
/// rewriter twice changes nothing.
pub fn rewrite_src(value: &str) -> Option<String> {
    if classify(value).is_external() || value.contains("{{") {
        return None;
    }
    Some(static_lookup(value))
}

fn style_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).expect("valid regex"))
}

/// Rewrite every `url(...)` in an inline style to a static lookup.
pub fn rewrite_style(style: &str) -> Cow<'_, str> {
    style_url_re().replace_all(style, r#"url("{{ url_for("static", filename="${1}") }}")"#)
}

/// Rewrite `href` and `src` attributes of every element in the document.
pub fn rewrite_links(document: &NodeRef) {
    for node in document.inclusive_descendants() {
        let Some(element) = node.as_element() else {
            continue;
        };
        let mut attributes = element.attributes.borrow_mut();

        let href = attributes.get("href").and_then(rewrite_href);
        if let Some(href) = href {
            attributes.insert("href", href);
        }

        let src = attributes.get("src").and_then(rewrite_src);
        if let Some(src) = src {
            attributes.insert("src", src);
        }
    }
}

/// Rewrite `url(...)` references inside `style` attributes.
pub fn rewrite_background_urls(document: &NodeRef) {
    for node in document.inclusive_descendants() {
        let Some(element) = node.as_element() else {
            continue;
        };
        let mut attributes = element.attributes.borrow_mut();

        let style = match attributes.get("style").map(rewrite_style) {
            Some(Cow::Owned(rewritten)) => rewritten,
            _ => continue,
        };
        attributes.insert("style", style);
    }
}
