use std::cell::RefCell;
use std::io::Write;
use std::path::{Path, PathBuf};

use console::style;

/// Destination for progress messages emitted by the pipeline.
pub trait LogSink {
    fn log(&self, message: &str);
}

/// Appends timestamped lines to a log file and echoes each message to stdout.
///
/// The file is opened and closed per message, so a crash mid-run still leaves
/// every earlier line on disk.
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

impl LogSink for FileLog {
    fn log(&self, message: &str) {
        let line = format_line(&chrono::Local::now(), message);
        if let Err(e) = self.append(&line) {
            eprintln!(
                "{} could not write to {}: {e}",
                style("warning:").yellow().bold(),
                self.path.display()
            );
        }
        println!("{message}");
    }
}

fn format_line<Tz: chrono::TimeZone>(at: &chrono::DateTime<Tz>, message: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("[{}] {message}", at.format("%Y-%m-%d %H:%M:%S"))
}

/// Collects messages in memory.
#[derive(Default)]
pub struct MemoryLog {
    messages: RefCell<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|m| m.contains(needle))
    }
}

impl LogSink for MemoryLog {
    fn log(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
