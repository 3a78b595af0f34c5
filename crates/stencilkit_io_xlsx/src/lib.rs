//! `stencilkit_io_xlsx` v1:
//! XLSX grid I/O kernel.
//!
//! - `conf`   : constants
//! - `spec`   : cell model and error types
//! - `util`   : pure helper functions
//! - `reader` : workbook-to-grid kernel
//! - `writer` : grid-to-workbook kernel
pub mod conf;
pub mod reader;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_SHEET_NAME_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
pub use reader::read_sheet_grid;
pub use spec::{EnumCellValue, SheetReadError, SheetWriteError};
pub use util::{derive_grid_width, normalize_grid_width, sanitize_sheet_name};
pub use writer::write_sheet_grid;
