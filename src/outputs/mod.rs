//! Output generation for reports and the session history.
//!
//! # Submodules
//!
//! - [`markdown`]: human-readable report and history, printed to stdout
//! - [`json`]: machine-readable session output and per-report JSON files

pub mod json;
pub mod markdown;
