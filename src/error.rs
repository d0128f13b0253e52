#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum FlaskifyError {
    #[error("Config file not found at {path}")]
    #[diagnostic(help("Please create a config.toml file (or pass --config <PATH>)"))]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse config file")]
    #[diagnostic(help("Check the TOML syntax in your config.toml file"))]
    ConfigParse {
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid source directory {path}: {reason}")]
    #[diagnostic(help("Pass the folder of a static site export as the first argument"))]
    InvalidSource { path: PathBuf, reason: String },

    #[error("Two pages would both be moved to templates/{name}: {first} and {second}")]
    #[diagnostic(help(
        "Templates are flattened into one folder; rename one of the pages so their file names differ"
    ))]
    TemplateNameCollision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed to render the entry point")]
    EntryPointRender {
        #[source]
        source: tera::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, FlaskifyError>;
