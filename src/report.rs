//! Outcome classification and human / JSON reporting

use crate::monotone::{Tolerances, Violation};
use crate::samples::Samples;
use serde::Serialize;
use std::io::{self, Write};

/// Process exit code for a clean run (or nothing to check)
pub const EXIT_OK: i32 = 0;
/// Process exit code when violations were found
pub const EXIT_VIOLATIONS: i32 = 1;
/// Process exit code for usage errors (missing columns, bad flags)
pub const EXIT_USAGE: i32 = 2;

/// Result of one validation pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "count")]
pub enum Outcome {
    /// No violations
    Ok,
    /// This many violations were found
    Violations(usize),
    /// Fewer than two rows; nothing was validated
    NotEnoughRows,
}

impl Outcome {
    /// Classifies a pass from its input size and violations
    pub fn of(rows: usize, violations: &[Violation]) -> Self {
        if rows < 2 {
            Outcome::NotEnoughRows
        } else if violations.is_empty() {
            Outcome::Ok
        } else {
            Outcome::Violations(violations.len())
        }
    }

    /// Exit code the binary should terminate with
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Violations(_) => EXIT_VIOLATIONS,
            Outcome::Ok | Outcome::NotEnoughRows => EXIT_OK,
        }
    }
}

/// Formats one violation as `line N: (x0,y0) -> (x1,y1)`; N is 1-based
pub fn format_violation(v: &Violation) -> String {
    format!(
        "line {}: ({:.6},{:.6}) -> ({:.6},{:.6})",
        v.index + 1,
        v.x0,
        v.y0,
        v.x1,
        v.y1
    )
}

/// Writes the human-readable report.
///
/// Diagnostics (violations, too-few-rows notice) go to `err`, the OK line to `out`.
pub fn write_text<O: Write, E: Write>(
    outcome: Outcome,
    violations: &[Violation],
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    match outcome {
        Outcome::NotEnoughRows => writeln!(err, "Not enough rows to check."),
        Outcome::Violations(_) => {
            writeln!(err, "Non-monotone Y detected in near-vertical runs:")?;
            for v in violations {
                writeln!(err, "  {}", format_violation(v))?;
            }
            Ok(())
        }
        Outcome::Ok => writeln!(out, "OK: no non-monotone Y in near-vertical runs."),
    }
}

/// Machine-readable summary of a pass
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Source path as given on the command line
    pub path: &'a str,
    /// Rows that reached the checker
    pub rows: usize,
    /// Rows dropped by the loader
    pub skipped: usize,
    /// Tolerances used
    pub tolerances: Tolerances,
    /// Outcome of the pass
    pub outcome: Outcome,
    /// Violations in index order
    pub violations: &'a [Violation],
}

impl<'a> JsonReport<'a> {
    /// Assembles the report for one pass
    pub fn new(path: &'a str, samples: &Samples, tolerances: Tolerances, violations: &'a [Violation]) -> Self {
        Self {
            path,
            rows: samples.points.len(),
            skipped: samples.skipped,
            tolerances,
            outcome: Outcome::of(samples.points.len(), violations),
            violations,
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }
}
