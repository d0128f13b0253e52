pub mod config;
pub mod convert;
pub mod error;
pub mod log;
pub mod stage;

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::convert::{convert_tree, ConversionReport};
use crate::error::{FlaskifyError, Result};
use crate::log::LogSink;
use crate::stage::{
    execute_restructure, plan_restructure, stage_working_copy, working_copy_path, RestructurePlan,
};

/// A conversion that has been planned but not yet written.
pub struct ConversionPlan {
    pub source: PathBuf,
    pub working_copy: PathBuf,
    /// Restructure steps as computed against the source tree. The working copy
    /// is re-planned after staging, since it may hold leftovers of earlier runs.
    pub restructure: RestructurePlan,
}

/// Resolve the working copy and plan the restructure, without writing anything.
pub fn plan_conversion(source: &Path, settings: &Settings) -> Result<ConversionPlan> {
    let working_copy = working_copy_path(source, &settings.flask_folder_suffix)?;
    let source = source.canonicalize().map_err(|e| FlaskifyError::Io {
        context: format!("resolving {}", source.display()),
        source: e,
    })?;
    let restructure = plan_restructure(&source)?;

    Ok(ConversionPlan {
        source,
        working_copy,
        restructure,
    })
}

/// Stage the working copy, move it into the Flask layout, then convert its pages.
///
/// Restructuring finishes completely before any page is rewritten, because the
/// rewritten static paths assume the final layout.
pub fn execute_conversion(
    plan: &ConversionPlan,
    settings: &Settings,
    log: &dyn LogSink,
) -> Result<ConversionReport> {
    stage_working_copy(&plan.source, &plan.working_copy)?;
    log.log(&format!(
        "Copied source folder '{}' to '{}'",
        plan.source.display(),
        plan.working_copy.display()
    ));

    let restructure = plan_restructure(&plan.working_copy)?;
    execute_restructure(&restructure, &plan.working_copy, log)?;

    let report = convert_tree(&plan.working_copy, settings, log)?;
    log.log("Flask conversion completed.");

    Ok(report)
}

/// Convert the static site at `source` into `<source><suffix>`.
pub fn convert(source: &Path, settings: &Settings, log: &dyn LogSink) -> Result<ConversionReport> {
    let plan = plan_conversion(source, settings)?;
    execute_conversion(&plan, settings, log)
}
