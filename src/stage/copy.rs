use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{FlaskifyError, Result};
use crate::stage::restructure::TEMPLATES_DIR;

/// Where the working copy of `source` lives: a sibling named `<source><suffix>`.
pub fn working_copy_path(source: &Path, suffix: &str) -> Result<PathBuf> {
    let source = source
        .canonicalize()
        .map_err(|e| FlaskifyError::InvalidSource {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !source.is_dir() {
        return Err(FlaskifyError::InvalidSource {
            path: source,
            reason: "not a directory".into(),
        });
    }

    if suffix.is_empty() {
        return Err(FlaskifyError::InvalidSource {
            path: source,
            reason: "flask_folder_suffix is empty, so the working copy would be the source itself"
                .into(),
        });
    }

    let name = source
        .file_name()
        .ok_or_else(|| FlaskifyError::InvalidSource {
            path: source.clone(),
            reason: "has no folder name to derive the working copy from".into(),
        })?
        .to_string_lossy()
        .into_owned();

    let working_copy = source.with_file_name(format!("{name}{suffix}"));
    if working_copy.starts_with(&source) {
        return Err(FlaskifyError::InvalidSource {
            path: source,
            reason: format!(
                "working copy {} would be nested inside the source",
                working_copy.display()
            ),
        });
    }

    Ok(working_copy)
}

/// Copy the contents of `source` into `working_copy`.
///
/// Templates produced by an earlier run are dropped first, so only pages still
/// in the source get converted. Top-level folders replace any folder of the same
/// name already in the working copy; top-level files overwrite. Anything else
/// already in the working copy is left alone.
pub fn stage_working_copy(source: &Path, working_copy: &Path) -> Result<()> {
    std::fs::create_dir_all(working_copy).map_err(|e| FlaskifyError::Io {
        context: format!("creating working copy {}", working_copy.display()),
        source: e,
    })?;

    let templates = working_copy.join(TEMPLATES_DIR);
    if templates.is_dir() {
        std::fs::remove_dir_all(&templates).map_err(|e| FlaskifyError::Io {
            context: format!("removing stale templates {}", templates.display()),
            source: e,
        })?;
    }

    let entries = std::fs::read_dir(source).map_err(|e| FlaskifyError::Io {
        context: format!("reading directory {}", source.display()),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| FlaskifyError::Io {
            context: format!("reading directory {}", source.display()),
            source: e,
        })?;
        let src = entry.path();
        let dest = working_copy.join(entry.file_name());

        if src.is_dir() {
            if dest.exists() {
                std::fs::remove_dir_all(&dest).map_err(|e| FlaskifyError::Io {
                    context: format!("removing {}", dest.display()),
                    source: e,
                })?;
            }
            copy_dir(&src, &dest)?;
        } else {
            std::fs::copy(&src, &dest).map_err(|e| FlaskifyError::Io {
                context: format!("copying {} to {}", src.display(), dest.display()),
                source: e,
            })?;
        }
    }

    Ok(())
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| FlaskifyError::Io {
            context: format!("walking {}", src.display()),
            source: e.into(),
        })?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .expect("entry must be under src");
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| FlaskifyError::Io {
                context: format!("creating directory {}", target.display()),
                source: e,
            })?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| FlaskifyError::Io {
                context: format!("copying {} to {}", entry.path().display(), target.display()),
                source: e,
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_copy_is_a_sibling() {
        let parent = tempfile::tempdir().unwrap();
        let source = parent.path().join("site");
        std::fs::create_dir(&source).unwrap();

        let copy = working_copy_path(&source, "_flask").unwrap();
        assert_eq!(copy, parent.path().canonicalize().unwrap().join("site_flask"));
    }

    #[test]
    fn trailing_separator_is_ignored() {
        let parent = tempfile::tempdir().unwrap();
        let source = parent.path().join("site");
        std::fs::create_dir(&source).unwrap();

        let with_slash = PathBuf::from(format!("{}/", source.display()));
        let copy = working_copy_path(&with_slash, "_flask").unwrap();
        assert!(copy.ends_with("site_flask"));
    }

    #[test]
    fn rejects_missing_file_and_empty_suffix() {
        let parent = tempfile::tempdir().unwrap();
        let file = parent.path().join("page.html");
        std::fs::write(&file, "x").unwrap();

        assert!(matches!(
            working_copy_path(&parent.path().join("missing"), "_flask"),
            Err(FlaskifyError::InvalidSource { .. })
        ));
        assert!(matches!(
            working_copy_path(&file, "_flask"),
            Err(FlaskifyError::InvalidSource { .. })
        ));
        assert!(matches!(
            working_copy_path(parent.path(), ""),
            Err(FlaskifyError::InvalidSource { .. })
        ));
    }

    #[test]
    fn rejects_copy_nested_in_source() {
        let parent = tempfile::tempdir().unwrap();
        let source = parent.path().join("site");
        std::fs::create_dir(&source).unwrap();

        assert!(matches!(
            working_copy_path(&source, "/out"),
            Err(FlaskifyError::InvalidSource { .. })
        ));
    }

    #[test]
    fn copies_tree_and_replaces_stale_folders() {
        let parent = tempfile::tempdir().unwrap();
        let source = parent.path().join("site");
        let copy = parent.path().join("site_flask");
        std::fs::create_dir_all(source.join("assets/img")).unwrap();
        std::fs::write(source.join("index.html"), "<p>new</p>").unwrap();
        std::fs::write(source.join("assets/img/logo.png"), "png").unwrap();

        std::fs::create_dir_all(copy.join("assets")).unwrap();
        std::fs::write(copy.join("assets/stale.txt"), "old").unwrap();
        std::fs::write(copy.join("index.html"), "<p>old</p>").unwrap();
        std::fs::write(copy.join("keep.txt"), "kept").unwrap();

        stage_working_copy(&source, &copy).unwrap();

        assert_eq!(std::fs::read_to_string(copy.join("index.html")).unwrap(), "<p>new</p>");
        assert_eq!(
            std::fs::read_to_string(copy.join("assets/img/logo.png")).unwrap(),
            "png"
        );
        assert!(!copy.join("assets/stale.txt").exists());
        assert!(copy.join("keep.txt").exists());
        assert!(source.join("index.html").exists());
    }

    #[test]
    fn drops_templates_from_an_earlier_run() {
        let parent = tempfile::tempdir().unwrap();
        let source = parent.path().join("site");
        let copy = parent.path().join("site_flask");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("index.html"), "<p>new</p>").unwrap();

        std::fs::create_dir_all(copy.join("templates")).unwrap();
        std::fs::write(copy.join("templates/old.html"), "{% block content %}").unwrap();

        stage_working_copy(&source, &copy).unwrap();

        assert!(!copy.join("templates").exists());
        assert!(copy.join("index.html").exists());
    }
}
