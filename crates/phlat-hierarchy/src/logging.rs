//! Logging module for hierarchy resolution
//!
//! Provides an opt-in trace of resolution passes: cycle pruning, unknown
//! bases, and redeclaration fan-out. Disabled (every call is a no-op)
//! until [`init_logger`] runs.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<ResolveLogger>> = Mutex::new(None);

/// Logger for resolution passes
pub struct ResolveLogger {
    file: File,
}

impl ResolveLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self { file })
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("/tmp/phlat-resolve-{}.log", timestamp))
    });

    let logger = ResolveLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log the start of a resolution pass
pub fn log_pass_start(class: &str) {
    section(&format!("RESOLVING {}", class));
}

/// Log the end of a resolution pass
pub fn log_pass_complete(class: &str, method_count: usize) {
    log(&format!("{}: {} methods collected", class, method_count));
}

/// Log a pruned cycle edge
pub fn log_cycle_pruned(class: &str, base: &str) {
    log(&format!("{}: pruned circular base {}", class, base));
}

/// Log an unresolvable base
pub fn log_unknown_base(class: &str, base: &str) {
    log(&format!("{}: unknown base {}", class, base));
}

/// Log a fan-out over a redeclared base
pub fn log_redeclared_fanout(class: &str, base: &str, candidates: usize) {
    log(&format!(
        "{}: base {} is redeclared, collecting {} candidates",
        class, base, candidates
    ));
}
