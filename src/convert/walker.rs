use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::Settings;
use crate::convert::document::transform_file;
use crate::convert::entry_point::{duplicate_functions, render_entry_point, PageRoute};
use crate::error::{FlaskifyError, Result};
use crate::log::LogSink;

/// Outcome of converting a working copy.
#[derive(Debug)]
pub struct ConversionReport {
    pub root: PathBuf,
    /// Converted pages, relative to `root`, in walk order.
    pub pages: Vec<PathBuf>,
    /// Path of the generated entry point, if one was written.
    pub entry_point: Option<PathBuf>,
}

/// All `.html` files under `root`, relative to it, sorted by path.
pub fn collect_pages(root: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|e| FlaskifyError::Io {
            context: format!("walking {}", root.display()),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() || !entry.file_name().to_string_lossy().ends_with(".html")
        {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .expect("entry must be under root");
        pages.push(rel.to_path_buf());
    }

    Ok(pages)
}

/// Convert every page under `root` and, if enabled, write the Flask entry point.
pub fn convert_tree(root: &Path, settings: &Settings, log: &dyn LogSink) -> Result<ConversionReport> {
    log.log(&format!("Starting Jinja conversion in folder: {}", root.display()));

    let pages = collect_pages(root)?;
    for page in &pages {
        let path = root.join(page);
        transform_file(&path)?;
        log.log(&format!("Converted template: {}", path.display()));
    }

    let mut report = ConversionReport {
        root: root.to_path_buf(),
        pages,
        entry_point: None,
    };

    if !settings.export_template_code {
        return Ok(report);
    }

    let routes: Vec<PageRoute> = report
        .pages
        .iter()
        .filter_map(|page| page.file_name())
        .map(|name| PageRoute::from_template(&name.to_string_lossy()))
        .collect();

    for (function, templates) in duplicate_functions(&routes) {
        log.log(&format!(
            "Warning: view function '{function}' is generated for several pages: {}",
            templates.join(", ")
        ));
    }

    let content = render_entry_point(&routes)?;
    let entry_point = root.join(&settings.entry_point_file);
    std::fs::write(&entry_point, content).map_err(|e| FlaskifyError::Io {
        context: format!("writing {}", entry_point.display()),
        source: e,
    })?;
    log.log(&format!(
        "Generated Flask main file: {}",
        settings.entry_point_file
    ));

    report.entry_point = Some(entry_point);
    Ok(report)
}
