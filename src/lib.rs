#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(missing_docs)]
//! Library entry for monocheck.
//!
//! Validates that sampled curves trace near-vertical strokes monotonically in
//! Y. A reversal inside such a run points at a sampling or rendering defect.
//!
//! # Modules
//! - [`monotone`]: Run classification and violation detection
//! - [`samples`]: CSV sample loading
//! - [`report`]: Outcome, exit codes and text / JSON reporting
//! - [`plot`]: Diagnostic chart (optional in binaries)

/// Near-vertical run detection and the monotone-Y check
pub mod monotone;

/// Loading sample points from CSV
pub mod samples;

/// Reporting of check results
pub mod report;

/// Visualization of samples and violations
pub mod plot;

pub use monotone::{check, Point, Tolerances, Violation};
