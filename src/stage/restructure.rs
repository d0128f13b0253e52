use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{FlaskifyError, Result};
use crate::log::LogSink;

pub const TEMPLATES_DIR: &str = "templates";
pub const ASSETS_DIR: &str = "assets";
pub const STATIC_DIR: &str = "static";

/// A planned filesystem operation. Paths are relative to the working copy root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FsOp {
    /// Create a directory.
    CreateDir { path: PathBuf },
    /// Move a page into the templates folder.
    Move { src: PathBuf, dest: PathBuf },
    /// Rename a directory.
    Rename { src: PathBuf, dest: PathBuf },
    /// Move the contents of `src` into the existing `dest`, replacing clashes,
    /// then remove `src`.
    Merge { src: PathBuf, dest: PathBuf },
    /// Remove a directory and everything in it.
    RemoveDir { path: PathBuf },
}

/// Restructuring steps computed up front, so they can be previewed before
/// anything is touched.
#[derive(Debug, Default)]
pub struct RestructurePlan {
    pub operations: Vec<FsOp>,
    /// Expected conditions worth reporting (no `assets` folder, ...).
    pub notes: Vec<String>,
}

impl RestructurePlan {
    pub fn moves(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.operations.iter().filter_map(|op| match op {
            FsOp::Move { src, dest } => Some((src.as_path(), dest.as_path())),
            _ => None,
        })
    }
}

/// Plan the move to the Flask layout: every page flattened into `templates/`,
/// `assets/` becoming `static/`.
///
/// Fails with [`FlaskifyError::TemplateNameCollision`] when two pages share a file
/// name, before anything has been moved.
pub fn plan_restructure(root: &Path) -> Result<RestructurePlan> {
    let mut plan = RestructurePlan::default();
    let templates = PathBuf::from(TEMPLATES_DIR);

    if !root.join(TEMPLATES_DIR).is_dir() {
        plan.operations.push(FsOp::CreateDir {
            path: templates.clone(),
        });
    }

    let mut claimed: HashMap<OsString, PathBuf> = HashMap::new();
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
            .expect("entry must be under root")
            .to_path_buf();
        // Already in place; a moved page may still replace it.
        if rel.parent() == Some(templates.as_path()) {
            continue;
        }

        let name = entry.file_name().to_os_string();
        if let Some(first) = claimed.get(&name) {
            return Err(FlaskifyError::TemplateNameCollision {
                name: name.to_string_lossy().into_owned(),
                first: first.clone(),
                second: rel,
            });
        }
        claimed.insert(name.clone(), rel.clone());

        plan.operations.push(FsOp::Move {
            src: rel,
            dest: templates.join(name),
        });
    }

    let assets_exists = root.join(ASSETS_DIR).is_dir();
    let static_exists = root.join(STATIC_DIR).is_dir();
    let nested_in_assets = root.join(ASSETS_DIR).join(ASSETS_DIR).is_dir();
    let nested_in_static = root.join(STATIC_DIR).join(ASSETS_DIR).is_dir();

    let nested_after = if assets_exists && !static_exists {
        plan.operations.push(FsOp::Rename {
            src: PathBuf::from(ASSETS_DIR),
            dest: PathBuf::from(STATIC_DIR),
        });
        nested_in_assets
    } else if assets_exists {
        plan.operations.push(FsOp::Merge {
            src: PathBuf::from(ASSETS_DIR),
            dest: PathBuf::from(STATIC_DIR),
        });
        nested_in_assets || nested_in_static
    } else {
        plan.notes.push("No 'assets' folder found.".to_string());
        nested_in_static
    };

    if nested_after {
        plan.operations.push(FsOp::RemoveDir {
            path: Path::new(STATIC_DIR).join(ASSETS_DIR),
        });
    } else {
        plan.notes
            .push("No 'static/assets' folder found to delete.".to_string());
    }

    Ok(plan)
}

/// Apply a plan to the working copy at `root`, logging every step.
///
/// Operations run in order with no rollback; a failure leaves the tree partly
/// restructured.
pub fn execute_restructure(plan: &RestructurePlan, root: &Path, log: &dyn LogSink) -> Result<()> {
    log.log(&format!("Processing directory: {}", root.display()));

    for op in &plan.operations {
        match op {
            FsOp::CreateDir { path } => {
                let abs = root.join(path);
                std::fs::create_dir_all(&abs).map_err(|e| FlaskifyError::Io {
                    context: format!("creating directory {}", abs.display()),
                    source: e,
                })?;
                log.log(&format!("Created '{}' folder at: {}", path.display(), abs.display()));
            }
            FsOp::Move { src, dest } => {
                let (abs_src, abs_dest) = (root.join(src), root.join(dest));
                replace_with(&abs_src, &abs_dest)?;
                log.log(&format!(
                    "Moved HTML file: {} to {}",
                    abs_src.display(),
                    abs_dest.parent().unwrap_or(root).display()
                ));
            }
            FsOp::Rename { src, dest } => {
                let (abs_src, abs_dest) = (root.join(src), root.join(dest));
                rename(&abs_src, &abs_dest)?;
                log.log(&format!(
                    "Renamed '{}' folder to '{}' at: {}",
                    src.display(),
                    dest.display(),
                    abs_dest.display()
                ));
            }
            FsOp::Merge { src, dest } => {
                let (abs_src, abs_dest) = (root.join(src), root.join(dest));
                merge_dir(&abs_src, &abs_dest)?;
                log.log(&format!(
                    "Merged '{}' folder into '{}' at: {}",
                    src.display(),
                    dest.display(),
                    abs_dest.display()
                ));
            }
            FsOp::RemoveDir { path } => {
                let abs = root.join(path);
                std::fs::remove_dir_all(&abs).map_err(|e| FlaskifyError::Io {
                    context: format!("removing {}", abs.display()),
                    source: e,
                })?;
                log.log(&format!("Deleted '{}' folder at: {}", path.display(), abs.display()));
            }
        }
    }

    for note in &plan.notes {
        log.log(note);
    }

    Ok(())
}

fn rename(src: &Path, dest: &Path) -> Result<()> {
    std::fs::rename(src, dest).map_err(|e| FlaskifyError::Io {
        context: format!("moving {} to {}", src.display(), dest.display()),
        source: e,
    })
}

/// Move `src` to `dest`, removing whatever is at `dest` first.
fn replace_with(src: &Path, dest: &Path) -> Result<()> {
    let removed = if dest.is_dir() {
        std::fs::remove_dir_all(dest)
    } else if dest.exists() {
        std::fs::remove_file(dest)
    } else {
        Ok(())
    };
    removed.map_err(|e| FlaskifyError::Io {
        context: format!("removing {}", dest.display()),
        source: e,
    })?;
    rename(src, dest)
}

fn merge_dir(src: &Path, dest: &Path) -> Result<()> {
    let entries = std::fs::read_dir(src).map_err(|e| FlaskifyError::Io {
        context: format!("reading directory {}", src.display()),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| FlaskifyError::Io {
            context: format!("reading directory {}", src.display()),
            source: e,
        })?;
        let from = entry.path();
        let to = dest.join(entry.file_name());

        if from.is_dir() && to.is_dir() {
            merge_dir(&from, &to)?;
        } else {
            replace_with(&from, &to)?;
        }
    }

    std::fs::remove_dir(src).map_err(|e| FlaskifyError::Io {
        context: format!("removing {}", src.display()),
        source: e,
    })
}
