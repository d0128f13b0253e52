use std::collections::BTreeMap;

use serde::Serialize;
use tera::{Context, Tera};

use crate::convert::naming::sanitize_identifier;
use crate::error::{FlaskifyError, Result};

const ENTRY_POINT_TEMPLATE: &str = "from flask import Flask, render_template
app = Flask(__name__)
{% for page in pages %}
@app.route('{{ page.route }}')
def {{ page.function }}():
    return render_template('{{ page.template }}')
{% endfor %}
if __name__ == '__main__':
    app.run(debug=True)
";

/// Stems served at `/` under the `index` endpoint.
const INDEX_STEMS: &[&str] = &["index", "index-app"];

/// One `@app.route` declaration in the generated entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRoute {
    /// Template file name passed to `render_template`.
    pub template: String,
    /// URL rule, e.g. `/about`.
    pub route: String,
    /// View function (and endpoint) name.
    pub function: String,
}

impl PageRoute {
    /// Build the route for a template file name such as `about.html`.
    pub fn from_template(template: &str) -> Self {
        let stem = template.strip_suffix(".html").unwrap_or(template);

        if INDEX_STEMS.contains(&stem) {
            return Self {
                template: template.to_string(),
                route: "/".to_string(),
                function: "index".to_string(),
            };
        }

        Self {
            template: template.to_string(),
            route: format!("/{stem}"),
            function: sanitize_identifier(stem),
        }
    }
}

/// Render the Flask entry point for the given pages.
pub fn render_entry_point(pages: &[PageRoute]) -> Result<String> {
    let mut tera = Tera::default();
    tera.add_raw_template("template_main.py", ENTRY_POINT_TEMPLATE)
        .map_err(|e| FlaskifyError::EntryPointRender { source: e })?;

    let mut context = Context::new();
    context.insert("pages", pages);

    tera.render("template_main.py", &context)
        .map_err(|e| FlaskifyError::EntryPointRender { source: e })
}

/// Function names claimed by more than one page, with the templates claiming them.
///
/// Flask refuses to register two views under one endpoint, so these are worth
/// reporting even though they are not resolved here.
pub fn duplicate_functions(pages: &[PageRoute]) -> BTreeMap<&str, Vec<&str>> {
    let mut by_function: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for page in pages {
        by_function
            .entry(page.function.as_str())
            .or_default()
            .push(page.template.as_str());
    }
    by_function.retain(|_, templates| templates.len() > 1);
    by_function
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("index.html", "/", "index")]
    #[case("index-app.html", "/", "index")]
    #[case("about.html", "/about", "about")]
    #[case("my-page.html", "/my-page", "my_page")]
    #[case("404.html", "/404", "_404")]
    fn route_for_template(#[case] template: &str, #[case] route: &str, #[case] function: &str) {
        let page = PageRoute::from_template(template);
        assert_eq!(page.template, template);
        assert_eq!(page.route, route);
        assert_eq!(page.function, function);
    }

    #[test]
    fn renders_single_page_exactly() {
        let out = render_entry_point(&[PageRoute::from_template("index.html")]).unwrap();
        assert_eq!(
            out,
            "from flask import Flask, render_template
app = Flask(__name__)

@app.route('/')
def index():
    return render_template('index.html')

if __name__ == '__main__':
    app.run(debug=True)
"
        );
    }

    #[test]
    fn renders_every_page() {
        let pages: Vec<PageRoute> = ["index.html", "about.html", "contact-us.html"]
            .iter()
            .map(|t| PageRoute::from_template(t))
            .collect();
        let out = render_entry_point(&pages).unwrap();

        assert_eq!(out.matches("@app.route(").count(), 3);
        assert!(out.contains("@app.route('/about')\ndef about():\n    return render_template('about.html')"));
        assert!(out.contains(
            "@app.route('/contact-us')\ndef contact_us():\n    return render_template('contact-us.html')"
        ));
    }

    #[test]
    fn renders_without_pages() {
        let out = render_entry_point(&[]).unwrap();
        assert!(out.starts_with("from flask import Flask, render_template\n"));
        assert!(!out.contains("@app.route"));
        assert!(out.ends_with("    app.run(debug=True)\n"));
    }

    #[test]
    fn reports_duplicate_functions() {
        let pages: Vec<PageRoute> = ["index.html", "index-app.html", "a-b.html", "a.b.html", "c.html"]
            .iter()
            .map(|t| PageRoute::from_template(t))
            .collect();
        let duplicates = duplicate_functions(&pages);

        assert_eq!(duplicates.len(), 2);
        assert_eq!(duplicates["index"], vec!["index.html", "index-app.html"]);
        assert_eq!(duplicates["a_b"], vec!["a-b.html", "a.b.html"]);
    }
}
