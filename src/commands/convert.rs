use std::path::{Path, PathBuf};

use console::style;
use flaskify::config::load_settings;
use flaskify::convert::{collect_pages, preview_page};
use flaskify::error::FlaskifyError;
use flaskify::log::{FileLog, LogSink};
use flaskify::stage::FsOp;
use flaskify::ConversionPlan;
use miette::Result;

pub fn run(
    source: Option<PathBuf>,
    config: PathBuf,
    log_file: PathBuf,
    dry_run: bool,
    verbose: bool,
) -> Result<()> {
    let log = FileLog::new(log_file);
    convert_with_log(source.as_deref(), &config, dry_run, verbose, &log)
}

fn convert_with_log(
    source: Option<&Path>,
    config: &Path,
    dry_run: bool,
    verbose: bool,
    log: &dyn LogSink,
) -> Result<()> {
    let settings = match load_settings(config) {
        Ok(settings) => settings,
        Err(e @ FlaskifyError::ConfigNotFound { .. }) => {
            log.log("Config file not found. Please create a config.toml file.");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let Some(source) = source else {
        log.log("No parameter provided.");
        return Ok(());
    };

    if dry_run {
        let plan = flaskify::plan_conversion(source, &settings)?;
        print_plan(&plan, verbose)?;
        return Ok(());
    }

    let report = flaskify::convert(source, &settings, log)?;

    println!(
        "\n{} Flask templates written to {}",
        style("✓").green().bold(),
        style(report.root.display()).cyan()
    );
    println!("  {} pages converted", report.pages.len());
    if let Some(entry_point) = &report.entry_point {
        println!("  entry point: {}", entry_point.display());
    }

    Ok(())
}

fn print_plan(plan: &ConversionPlan, verbose: bool) -> Result<()> {
    println!(
        "\n{} Dry run \u{2014} {} would be converted into {}:",
        style("==>").cyan().bold(),
        style(plan.source.display()).cyan(),
        style(plan.working_copy.display()).cyan()
    );

    for op in &plan.restructure.operations {
        match op {
            FsOp::CreateDir { path } => {
                println!("  {} {}", style("create").green(), path.display());
            }
            FsOp::Move { src, dest } => {
                println!("  {} {} → {}", style("move").blue(), src.display(), dest.display());
            }
            FsOp::Rename { src, dest } => {
                println!("  {} {} → {}", style("rename").blue(), src.display(), dest.display());
            }
            FsOp::Merge { src, dest } => {
                println!("  {} {} → {}", style("merge").yellow(), src.display(), dest.display());
            }
            FsOp::RemoveDir { path } => {
                println!("  {} {}", style("delete").red(), path.display());
            }
        }
    }
    for note in &plan.restructure.notes {
        println!("  {} {}", style("ℹ").blue(), note);
    }

    let pages = collect_pages(&plan.source)?;
    println!("\nSummary: {} pages to convert", pages.len());

    if verbose {
        for page in &pages {
            println!("\n{}", preview_page(&plan.source.join(page))?);
        }
    }

    println!(
        "\n{} Dry run \u{2014} no files written.",
        style("\u{2139}").blue().bold()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flaskify::log::MemoryLog;

    fn write_config(dir: &Path) -> PathBuf {
        let config = dir.join("config.toml");
        std::fs::write(&config, "flask_folder_suffix = \"_flask\"\n").unwrap();
        config
    }

    #[test]
    fn missing_source_logs_and_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path());
        let log = MemoryLog::new();

        convert_with_log(None, &config, false, false, &log).unwrap();

        assert_eq!(log.messages(), vec!["No parameter provided.".to_string()]);
    }

    #[test]
    fn missing_config_logs_and_fails() {
        let dir = tempfile::tempdir().unwrap();
        let log = MemoryLog::new();

        let err = convert_with_log(
            Some(dir.path()),
            &dir.path().join("config.toml"),
            false,
            false,
            &log,
        )
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FlaskifyError>(),
            Some(FlaskifyError::ConfigNotFound { .. })
        ));
        assert!(log.contains("Config file not found. Please create a config.toml file."));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path());
        let source = dir.path().join("site");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("index.html"), "<html><body>x</body></html>").unwrap();
        let log = MemoryLog::new();

        convert_with_log(Some(&source), &config, true, true, &log).unwrap();

        assert!(!dir.path().join("site_flask").exists());
        assert!(log.messages().is_empty());
    }

    #[test]
    fn converts_with_loaded_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path());
        let source = dir.path().join("site");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(source.join("index.html"), "<html><body>x</body></html>").unwrap();
        let log = MemoryLog::new();

        convert_with_log(Some(&source), &config, false, false, &log).unwrap();

        assert!(dir.path().join("site_flask/templates/index.html").exists());
        assert!(log.contains("Flask conversion completed."));
    }
}
