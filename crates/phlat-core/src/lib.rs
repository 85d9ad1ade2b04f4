//! phlat-core: shared infrastructure for the phlat analysis pipeline
//!
//! This crate holds the pieces every phlat stage agrees on:
//!
//! - Source-site coordinates attached to declarations and diagnostics
//! - The structured diagnostics channel that resolution passes report
//!   into and callers drain afterwards
//!
//! Nothing in here aborts analysis: a diagnostic is a record, not a
//! control-flow event.

pub mod diag;
pub mod site;

pub use diag::{Diagnostic, DiagnosticKind, Diagnostics};
pub use site::SourceSite;
