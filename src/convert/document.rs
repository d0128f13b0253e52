use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use kuchikiki::traits::TendrilSink;
use kuchikiki::NodeRef;
use regex_lite::Regex;

use crate::convert::links::{
    rewrite_background_urls, rewrite_links, route_lookup, static_lookup,
};
use crate::convert::serialize::{serialize_document, serialize_fragment};
use crate::error::{FlaskifyError, Result};

pub const BLOCK_OPEN: &str = "{% block content %}";
pub const BLOCK_CLOSE: &str = "{% endblock content %}";

/// Stripped from the serialized page once `assets/` has become the static root.
const ASSETS_SEGMENT: &str = "/assets/";

/// Parse markup into a document tree. Never fails; broken markup is repaired
/// the way a browser would.
pub fn parse_document(markup: &str) -> NodeRef {
    kuchikiki::parse_html().one(markup)
}

fn body_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<body[\s>/]").expect("valid regex"))
}

fn document_shell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<(!doctype|html|head|body)[\s>/]").expect("valid regex"))
}

fn hidden_markup_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<!--.*?-->|<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
            .expect("valid regex")
    })
}

/// The markup with comments and script/style contents removed, leaving only
/// the tags the parser turns into elements.
fn visible_tags(markup: &str) -> Cow<'_, str> {
    hidden_markup_re().replace_all(markup, "")
}

/// Surround the `<body>` element with content block markers.
///
/// Returns `false` when the document has no body element.
pub fn wrap_body(document: &NodeRef) -> bool {
    let body = document.inclusive_descendants().find(|node| {
        node.as_element()
            .is_some_and(|element| &*element.name.local == "body")
    });

    match body {
        Some(body) => {
            body.insert_before(NodeRef::new_text(BLOCK_OPEN));
            body.insert_after(NodeRef::new_text(BLOCK_CLOSE));
            true
        }
        None => false,
    }
}

/// Turn one static page into a Jinja template.
pub fn transform_markup(markup: &str) -> String {
    let document = parse_document(markup);

    rewrite_links(&document);
    rewrite_background_urls(&document);

    // The parser invents html/head/body for fragments (partials, snippets); only
    // wrap a body the page really has, and keep fragments as fragments.
    let tags = visible_tags(markup);
    if body_tag_re().is_match(&tags) {
        wrap_body(&document);
    }
    let serialized = if document_shell_re().is_match(&tags) {
        serialize_document(&document)
    } else {
        serialize_fragment(&document)
    };

    serialized
        .replace(ASSETS_SEGMENT, "")
        .replace(&static_lookup("/"), &route_lookup("index"))
}

/// Convert the page at `path` in place.
pub fn transform_file(path: &Path) -> Result<()> {
    let markup = std::fs::read_to_string(path).map_err(|e| FlaskifyError::Io {
        context: format!("reading {}", path.display()),
        source: e,
    })?;

    let converted = transform_markup(&markup);
    replace_file(path, converted.as_bytes())
}

/// Overwrite `path` through a temp file in the same directory, keeping its permissions.
fn replace_file(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let permissions = std::fs::metadata(path)
        .map_err(|e| FlaskifyError::Io {
            context: format!("reading metadata of {}", path.display()),
            source: e,
        })?
        .permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| FlaskifyError::Io {
        context: format!("creating temp file in {}", dir.display()),
        source: e,
    })?;
    tmp.write_all(content).map_err(|e| FlaskifyError::Io {
        context: format!("writing {}", tmp.path().display()),
        source: e,
    })?;
    std::fs::set_permissions(tmp.path(), permissions).map_err(|e| FlaskifyError::Io {
        context: format!("setting permissions on {}", tmp.path().display()),
        source: e,
    })?;
    tmp.persist(path).map_err(|e| FlaskifyError::Io {
        context: format!("replacing {}", path.display()),
        source: e.error,
    })?;

    Ok(())
}
