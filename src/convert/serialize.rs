//! HTML serialization that leaves Jinja expressions intact.
//!
//! The stock html5ever serializer always double-quotes attribute values and
//! escapes inner `"` as `&quot;`, which turns
//! `url("{{ url_for("static", filename="bg.png") }}")` into something Jinja can no
//! longer parse. Here a value containing `"` (and no `'`) is single-quoted instead
//! and written verbatim.

use kuchikiki::{NodeData, NodeRef};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

const FOREIGN_NAMESPACES: &[&str] = &[
    "http://www.w3.org/2000/svg",
    "http://www.w3.org/1998/Math/MathML",
];

const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Serialize a parsed document (or any subtree) back to markup.
pub fn serialize_document(node: &NodeRef) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

/// Serialize only what the page itself contained, without the `html`, `head`
/// and `body` elements the parser adds around a bare fragment.
pub fn serialize_fragment(document: &NodeRef) -> String {
    let mut out = String::new();
    for child in document.children() {
        if !is_element(&child, "html") {
            write_node(&child, &mut out);
            continue;
        }
        for section in child.children() {
            if is_element(&section, "head") || is_element(&section, "body") {
                write_children(&section, &mut out);
            } else {
                write_node(&section, &mut out);
            }
        }
    }
    out
}

fn is_element(node: &NodeRef, name: &str) -> bool {
    node.as_element()
        .is_some_and(|element| &*element.name.local == name)
}

fn write_node(node: &NodeRef, out: &mut String) {
    match node.data() {
        NodeData::Document(_) | NodeData::DocumentFragment => write_children(node, out),
        NodeData::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(&doctype.name);
            out.push('>');
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(&text.borrow());
            out.push_str("-->");
        }
        NodeData::ProcessingInstruction(pi) => {
            let pi = pi.borrow();
            out.push_str("<?");
            out.push_str(&pi.0);
            out.push(' ');
            out.push_str(&pi.1);
            out.push('>');
        }
        NodeData::Text(text) => {
            let text = text.borrow();
            if parent_is_raw_text(node) {
                out.push_str(&text);
            } else {
                escape_text(&text, out);
            }
        }
        NodeData::Element(element) => {
            let name = &*element.name.local;
            out.push('<');
            out.push_str(name);
            for (key, attribute) in element.attributes.borrow().map.iter() {
                out.push(' ');
                if let Some(prefix) = &attribute.prefix {
                    out.push_str(prefix);
                    out.push(':');
                }
                out.push_str(&key.local);
                out.push('=');
                write_attribute_value(&attribute.value, out);
            }

            // SVG and MathML elements may self-close; keep `<path/>` as written.
            if FOREIGN_NAMESPACES.contains(&&*element.name.ns) && node.first_child().is_none() {
                out.push_str("/>");
                return;
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&name) {
                return;
            }

            if matches!(name, "pre" | "textarea" | "listing") && starts_with_newline(node) {
                out.push('\n');
            }

            match &element.template_contents {
                Some(contents) => write_children(contents, out),
                None => write_children(node, out),
            }

            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn write_children(node: &NodeRef, out: &mut String) {
    for child in node.children() {
        write_node(&child, out);
    }
}

fn parent_is_raw_text(node: &NodeRef) -> bool {
    node.parent()
        .and_then(|parent| {
            parent
                .as_element()
                .map(|e| RAW_TEXT_ELEMENTS.contains(&&*e.name.local))
        })
        .unwrap_or(false)
}

// The parser drops a single leading newline in these elements, so one has to be
// put back for the content to survive a round trip.
fn starts_with_newline(node: &NodeRef) -> bool {
    node.first_child()
        .and_then(|child| child.as_text().map(|t| t.borrow().starts_with('\n')))
        .unwrap_or(false)
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn write_attribute_value(value: &str, out: &mut String) {
    let single_quoted = value.contains('"') && !value.contains('\'');
    let quote = if single_quoted { '\'' } else { '"' };

    out.push(quote);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if !single_quoted => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out.push(quote);
}
