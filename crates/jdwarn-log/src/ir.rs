use serde::{Deserialize, Serialize};
use std::fmt;

/// Path recorded for warnings that carry no file context.
pub const NO_FILE: &str = "-";

/// Line number recorded for warnings that carry no line context.
pub const NO_LINE: u32 = 0;

/// Category shared by every record of the default parser.
pub const DEFAULT_CATEGORY: &str = "JavaDoc";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Normal,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "LOW",
            Severity::Normal => "NORMAL",
            Severity::High => "HIGH",
        };
        f.write_str(label)
    }
}

/// A single warning extracted from a build log.
///
/// Two records are equal only when every field is equal; the collector relies
/// on this to drop repeats.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WarningRecord {
    pub file_path: String,
    pub line_number: u32,
    pub message: String,
    pub severity: Severity,
    pub category: String,
}

impl WarningRecord {
    pub fn new(
        file_path: impl Into<String>,
        line_number: u32,
        message: impl Into<String>,
        severity: Severity,
        category: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            line_number,
            message: message.into(),
            severity,
            category: category.into(),
        }
    }

    /// Returns `true` if the warning names a source file.
    pub fn has_file(&self) -> bool {
        self.file_path != NO_FILE
    }
}

/// Per-severity counts over a set of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveritySummary {
    pub low: usize,
    pub normal: usize,
    pub high: usize,
}

impl SeveritySummary {
    pub fn from_records(records: &[WarningRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match record.severity {
                Severity::Low => summary.low += 1,
                Severity::Normal => summary.normal += 1,
                Severity::High => summary.high += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.low + self.normal + self.high
    }
}
