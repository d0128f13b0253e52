use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "flaskify",
    about = "Convert a static HTML site export into a Flask/Jinja template bundle",
    version
)]
pub struct Cli {
    /// Folder of the static site to convert
    pub source: Option<PathBuf>,

    /// Extra arguments are accepted and ignored
    #[arg(hide = true)]
    pub extra: Vec<String>,

    /// Settings file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Append progress messages to this file
    #[arg(long, default_value = "flaskify_log.txt")]
    pub log_file: PathBuf,

    /// Show the planned restructure without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, also show how each page would be rewritten
    #[arg(short, long)]
    pub verbose: bool,
}
