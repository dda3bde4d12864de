//! Merge report model.

use std::fmt;

/// Counters and diagnostics for one merge run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportMerge {
    /// Primary records read.
    pub cnt_primary: usize,
    /// Secondary records read.
    pub cnt_secondary: usize,
    /// Output records that received secondary fields.
    pub cnt_overlaid: usize,
    /// Non-fatal alignment and key diagnostics.
    pub warnings: Vec<String>,
}

impl ReportMerge {
    pub(crate) fn new(cnt_primary: usize, cnt_secondary: usize) -> Self {
        Self {
            cnt_primary,
            cnt_secondary,
            ..Default::default()
        }
    }

    /// Add a warning message.
    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} primary={} secondary={} overlaid={} warnings={}",
            self.cnt_primary,
            self.cnt_secondary,
            self.cnt_overlaid,
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[MERGE]"))
    }
}
