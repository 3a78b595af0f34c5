//! Fill specification models and top-level error types.

use std::fmt;
use std::path::PathBuf;

use stencilkit_io_xlsx::EnumCellValue;

use crate::conf::{
    C_MARKER_CONSUMED, C_TOKEN_ASSET, C_TOKEN_TEXT, N_IDX_COL_PROCESSED_AT, N_IDX_COL_STATUS,
    N_NCOLS_TRACKED,
};

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Per-file row budget policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumReplacementCountMode {
    /// Derive the budget from the template: `min(text tokens, asset tokens)`.
    Dynamic,
    /// Consume exactly this many rows per file (must be positive).
    Fixed(i64),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `fill_rows` / `process_batch`.
#[derive(Debug, Clone)]
pub struct SpecFillOptions {
    /// Per-file row budget policy.
    pub rule_replacement_count: EnumReplacementCountMode,
    /// Literal placeholder replaced with row content text.
    pub token_text: String,
    /// Literal placeholder replaced with row asset-path text.
    pub token_asset: String,
}

impl Default for SpecFillOptions {
    fn default() -> Self {
        Self {
            rule_replacement_count: EnumReplacementCountMode::Dynamic,
            token_text: C_TOKEN_TEXT.to_string(),
            token_asset: C_TOKEN_ASSET.to_string(),
        }
    }
}

/// One spreadsheet row: raw cells plus the tracked consumption columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRowRecord {
    /// Cells in sheet column order (index 0 is the untouched id column).
    pub cells: Vec<EnumCellValue>,
}

impl SpecRowRecord {
    /// Wrap a raw cell vector.
    pub fn new(cells: Vec<EnumCellValue>) -> Self {
        Self { cells }
    }

    /// True when the status column holds the consumed marker.
    ///
    /// Comparison trims whitespace so hand-edited sheets still resume.
    pub fn is_consumed(&self) -> bool {
        self.cells
            .get(N_IDX_COL_STATUS)
            .is_some_and(|cell_value| cell_value.to_display_text().trim() == C_MARKER_CONSUMED)
    }

    /// Stamp the consumed marker and processed-at text, widening the cell
    /// vector to the tracked column count when needed.
    pub fn mark_consumed(&mut self, processed_at: &str) {
        if self.cells.len() < N_NCOLS_TRACKED {
            self.cells.resize(N_NCOLS_TRACKED, EnumCellValue::None);
        }
        self.cells[N_IDX_COL_STATUS] = EnumCellValue::String(C_MARKER_CONSUMED.to_string());
        self.cells[N_IDX_COL_PROCESSED_AT] = EnumCellValue::String(processed_at.to_string());
    }
}

/// Progress snapshot delivered after each emitted output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecFillProgress {
    /// Rows currently marked consumed (rows consumed by earlier runs count).
    pub cnt_rows_consumed: usize,
    /// Total rows in the sheet.
    pub cnt_rows_total: usize,
    /// Output files emitted so far by this run.
    pub cnt_files_emitted: usize,
}

/// One recovered row-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRowError {
    /// Zero-based sheet row index.
    pub idx_row: usize,
    /// User-facing error text.
    pub exception: String,
}

/// One recovered output-file write failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecOutputError {
    /// Output file path that failed.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// "Top-level call failed" errors (input validation / setup stage).
#[derive(Debug)]
pub enum FillBatchError {
    /// Source spreadsheet could not be read.
    SpreadsheetReadFailed {
        /// Spreadsheet path that failed to read.
        path: PathBuf,
        /// Underlying reader error text.
        message: String,
    },
    /// Template file could not be read as UTF-8 text.
    TemplateReadFailed {
        /// Template path that failed to read.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
    /// Fixed row budget is zero or negative.
    InvalidReplacementCount(String),
    /// Dynamic policy found no usable token pair in the template.
    TokensNotFound {
        /// Text-token occurrences in the template.
        cnt_token_text: usize,
        /// Asset-token occurrences in the template.
        cnt_token_asset: usize,
    },
    /// Output directory initialization failed.
    OutputDirInitFailed {
        /// Output directory that failed initialization.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

impl fmt::Display for FillBatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpreadsheetReadFailed { path, message } => {
                write!(
                    f,
                    "Failed to read spreadsheet {}: {message}",
                    path.display()
                )
            }
            Self::TemplateReadFailed { path, message } => {
                write!(f, "Failed to read template {}: {message}", path.display())
            }
            Self::InvalidReplacementCount(msg) => write!(f, "{msg}"),
            Self::TokensNotFound {
                cnt_token_text,
                cnt_token_asset,
            } => write!(
                f,
                "Template has no usable token pair (text tokens: {cnt_token_text}, asset tokens: {cnt_token_asset})"
            ),
            Self::OutputDirInitFailed { path, message } => {
                write!(
                    f,
                    "Failed to initialize output directory {}: {message}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for FillBatchError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
