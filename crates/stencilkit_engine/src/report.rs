//! Fill report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::{SpecOutputError, SpecRowError};

/// Aggregate counters and diagnostics for one fill run.
#[derive(Debug, Default, Clone)]
pub struct ReportFill {
    /// Total rows in the sheet.
    pub cnt_rows_total: u64,
    /// Rows consumed by this run.
    pub cnt_rows_consumed: u64,
    /// Already-consumed rows encountered and skipped during the scan.
    pub cnt_rows_skipped: u64,
    /// Output files written successfully.
    pub cnt_files_emitted: u64,
    /// Non-fatal diagnostics (empty-content substitutions and the like).
    pub warnings: Vec<String>,
    /// Recovered per-row failures.
    pub errors_row: Vec<SpecRowError>,
    /// Recovered output-file write failures.
    pub errors_output: Vec<SpecOutputError>,
    /// Final spreadsheet save failure, when one occurred.
    pub error_persist: Option<String>,
}

impl ReportFill {
    /// Number of collected hard errors (row, output and persist stages).
    pub fn error_count(&self) -> usize {
        self.errors_row.len() + self.errors_output.len() + usize::from(self.error_persist.is_some())
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_rows_total".to_string(), self.cnt_rows_total);
        dict_counts.insert("cnt_rows_consumed".to_string(), self.cnt_rows_consumed);
        dict_counts.insert("cnt_rows_skipped".to_string(), self.cnt_rows_skipped);
        dict_counts.insert("cnt_files_emitted".to_string(), self.cnt_files_emitted);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} rows={} consumed={} skipped={} files={} errors={} warnings={}",
            dict_counts["cnt_rows_total"],
            dict_counts["cnt_rows_consumed"],
            dict_counts["cnt_rows_skipped"],
            dict_counts["cnt_files_emitted"],
            dict_counts["cnt_errors"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[FILL]"))
    }
}

/// Mutable accumulator for fill statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportFillBuilder {
    /// See [`ReportFill::cnt_rows_total`].
    pub cnt_rows_total: u64,
    /// See [`ReportFill::cnt_rows_consumed`].
    pub cnt_rows_consumed: u64,
    /// See [`ReportFill::cnt_rows_skipped`].
    pub cnt_rows_skipped: u64,
    /// See [`ReportFill::cnt_files_emitted`].
    pub cnt_files_emitted: u64,
    /// See [`ReportFill::warnings`].
    pub warnings: Vec<String>,
    /// See [`ReportFill::errors_row`].
    pub errors_row: Vec<SpecRowError>,
    /// See [`ReportFill::errors_output`].
    pub errors_output: Vec<SpecOutputError>,
    /// See [`ReportFill::error_persist`].
    pub error_persist: Option<String>,
}

impl ReportFillBuilder {
    /// Increment consumed-row count by one.
    pub fn add_consumed(&mut self) {
        self.cnt_rows_consumed += 1;
    }

    /// Increment skipped-row count by one.
    pub fn add_skipped(&mut self) {
        self.cnt_rows_skipped += 1;
    }

    /// Increment emitted-file count by one.
    pub fn add_file_emitted(&mut self) {
        self.cnt_files_emitted += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one row-scoped error.
    pub fn add_error_row(&mut self, idx_row: usize, exception: String) {
        self.errors_row.push(SpecRowError { idx_row, exception });
    }

    /// Add one output-file error.
    pub fn add_error_output(&mut self, path: std::path::PathBuf, exception: String) {
        self.errors_output.push(SpecOutputError { path, exception });
    }

    /// Record the final-save failure.
    pub fn set_error_persist(&mut self, message: String) {
        self.error_persist = Some(message);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportFill {
        ReportFill {
            cnt_rows_total: self.cnt_rows_total,
            cnt_rows_consumed: self.cnt_rows_consumed,
            cnt_rows_skipped: self.cnt_rows_skipped,
            cnt_files_emitted: self.cnt_files_emitted,
            warnings: self.warnings,
            errors_row: self.errors_row,
            errors_output: self.errors_output,
            error_persist: self.error_persist,
        }
    }
}
