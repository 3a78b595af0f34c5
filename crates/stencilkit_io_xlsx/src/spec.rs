//! Shared XLSX specification models and top-level error types.

use std::fmt;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region CellModel

/// Normalized cell value in the read/write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl EnumCellValue {
    /// Render the cell as substitution text.
    ///
    /// `None` renders empty; integral finite numbers render without a
    /// trailing `.0` so id-like columns survive the numeric round trip.
    pub fn to_display_text(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::String(value) => value.clone(),
            Self::Number(value) => {
                if value.is_finite() && value.fract() == 0.0 {
                    (*value as i64).to_string()
                } else {
                    value.to_string()
                }
            }
        }
    }

    /// True when the cell carries no value or only whitespace text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::None => true,
            Self::String(value) => value.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// "Workbook read failed" errors (input stage).
#[derive(Debug)]
pub enum SheetReadError {
    /// Workbook file could not be opened or parsed.
    FileUnreadable {
        /// Workbook path that failed to open.
        path: PathBuf,
        /// Underlying reader error text.
        message: String,
    },
    /// Workbook contains no worksheet.
    NoWorksheet(PathBuf),
}

impl fmt::Display for SheetReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileUnreadable { path, message } => {
                write!(f, "Failed to read workbook {}: {message}", path.display())
            }
            Self::NoWorksheet(path) => {
                write!(f, "Workbook has no worksheet: {}", path.display())
            }
        }
    }
}

impl std::error::Error for SheetReadError {}

/// "Workbook save failed" errors (persist stage).
#[derive(Debug)]
pub enum SheetWriteError {
    /// Grid does not fit one Excel worksheet.
    GridTooLarge {
        /// Grid row count.
        n_rows: usize,
        /// Grid column count.
        n_cols: usize,
    },
    /// Workbook serialization or save failed.
    SaveFailed {
        /// Workbook path that failed to save.
        path: PathBuf,
        /// Underlying writer error text.
        message: String,
    },
}

impl fmt::Display for SheetWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridTooLarge { n_rows, n_cols } => write!(
                f,
                "Grid of {n_rows} rows x {n_cols} columns exceeds one worksheet"
            ),
            Self::SaveFailed { path, message } => {
                write!(f, "Failed to save workbook {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for SheetWriteError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
