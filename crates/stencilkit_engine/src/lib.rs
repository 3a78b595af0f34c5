//! `stencilkit_engine` v1:
//! Row-consumption and template-fill engine.
//!
//! - `conf`   : constants and default presets
//! - `spec`   : row/options/progress models and error types
//! - `report` : run report model and builder
//! - `util`   : pure helper functions
//! - `fill`   : per-file row consumption loop
//! - `batch`  : read-fill-persist orchestration
pub mod batch;
pub mod conf;
pub mod fill;
pub mod report;
pub mod spec;
pub mod util;

pub use batch::process_batch;
pub use conf::derive_default_fill_options;
pub use fill::fill_rows;
pub use report::{ReportFill, ReportFillBuilder};
pub use spec::{
    EnumReplacementCountMode, FillBatchError, SpecFillOptions, SpecFillProgress, SpecOutputError,
    SpecRowError, SpecRowRecord,
};
pub use stencilkit_io_xlsx::EnumCellValue;
pub use util::{
    convert_grid_to_rows, convert_rows_to_grid, count_token_occurrences,
    derive_replacements_per_file, generate_output_filename, replace_first_occurrence,
};
