//! Source coordinates for declarations and diagnostics

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Location of a declaration in the analyzed source tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceSite {
    /// File the declaration lives in
    pub file: PathBuf,
    /// Line number (1-based); 0 when unknown
    pub line: usize,
}

impl SourceSite {
    /// Create a site from a file path and 1-based line number
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Site for declarations without a source position (builtins, placeholders)
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether this site carries a real position
    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for SourceSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{}:{}", self.file.display(), self.line)
        } else {
            write!(f, "<unknown>")
        }
    }
}
