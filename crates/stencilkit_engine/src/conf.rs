//! Fill constants and default preset factories.

use crate::spec::SpecFillOptions;

/// Placeholder token replaced with row content text.
pub const C_TOKEN_TEXT: &str = "文案";
/// Placeholder token replaced with row asset-path text.
pub const C_TOKEN_ASSET: &str = "图片";
/// Status-column marker identifying a consumed row.
pub const C_MARKER_CONSUMED: &str = "done";
/// Timestamp format written to the processed-at column.
pub const C_FMT_PROCESSED_AT: &str = "%Y-%m-%d %H:%M:%S";
/// Timestamp format used in output file names.
pub const C_FMT_FILE_STAMP: &str = "%Y%m%d_%H%M%S";
/// Output file extension.
pub const C_EXT_OUTPUT: &str = "txt";

/// Zero-based sheet column of the content text.
pub const N_IDX_COL_CONTENT: usize = 1;
/// Zero-based sheet column of the asset path.
pub const N_IDX_COL_ASSET: usize = 2;
/// Zero-based sheet column of the consumed marker.
pub const N_IDX_COL_STATUS: usize = 3;
/// Zero-based sheet column of the processed-at timestamp.
pub const N_IDX_COL_PROCESSED_AT: usize = 4;
/// Column count the engine tracks (rows are widened to this on load).
pub const N_NCOLS_TRACKED: usize = 5;

/// Build default fill options (dynamic count policy, stock tokens).
pub fn derive_default_fill_options() -> SpecFillOptions {
    SpecFillOptions::default()
}
