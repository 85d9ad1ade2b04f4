//! Diagnostic types for hierarchy resolution results
//!
//! Every recoverable problem found while resolving a class hierarchy is
//! reported here as a structured record. The resolver never fails hard on
//! one of these; the caller drains the collection after the pass.

use crate::site::SourceSite;
use serde::Serialize;
use std::fmt;

/// What went wrong, in terms the binding stage understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    /// The class hierarchy contains a circular reference
    CircularDerivation,
    /// A base name resolves to no known declaration
    UnknownBaseClass,
    /// Several declarations of one trait name
    RedeclaredTrait,
    /// Two methods with one name inside a single declaration
    DeclaredMethodTwice,
    /// A final method is overridden further down the hierarchy
    InvalidOverride,
    /// A user attribute given twice on one declaration
    RedeclaredAttribute,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticKind::CircularDerivation => "circular.derivation",
            DiagnosticKind::UnknownBaseClass => "unknown.baseClass",
            DiagnosticKind::RedeclaredTrait => "redeclared.trait",
            DiagnosticKind::DeclaredMethodTwice => "declared.methodTwice",
            DiagnosticKind::InvalidOverride => "invalid.override",
            DiagnosticKind::RedeclaredAttribute => "redeclared.attribute",
        };
        f.write_str(s)
    }
}

/// A single problem found during resolution
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    /// Problem category
    pub kind: DiagnosticKind,
    /// Declaration site the problem was found at
    pub site: SourceSite,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, site: SourceSite, message: impl Into<String>) -> Self {
        Self {
            kind,
            site,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.site, self.message, self.kind)
    }
}

/// Collection of diagnostics from one or more resolution passes
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, site: SourceSite, message: impl Into<String>) {
        self.records.push(Diagnostic::new(kind, site, message));
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.records.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.records.extend(diagnostics);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records of one kind
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.records.iter().filter(|d| d.kind == kind).count()
    }

    /// Whether any record of the given kind was reported
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.records.iter().any(|d| d.kind == kind)
    }

    /// Sort records by file, then line
    pub fn sort(&mut self) {
        self.records
            .sort_by(|a, b| a.site.file.cmp(&b.site.file).then_with(|| a.site.line.cmp(&b.site.line)));
    }

    /// Take all records out, leaving the collection empty
    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.records)
    }

    pub fn into_records(self) -> Vec<Diagnostic> {
        self.records
    }
}
