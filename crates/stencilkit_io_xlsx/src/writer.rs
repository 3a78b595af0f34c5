//! XLSX writer kernel that persists a cell grid as a single-sheet workbook.

use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::conf::{C_SHEET_NAME_DEFAULT, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::spec::{EnumCellValue, SheetWriteError};
use crate::util::{derive_grid_width, sanitize_sheet_name};

/// Write `grid` as one headerless worksheet, replacing `path_file_out`.
///
/// `String` cells are written as text, `Number` cells as numbers and `None`
/// cells are left blank. The save rewrites the workbook wholesale; nothing
/// from a previous file at the same path survives. `sheet_name` is sanitized
/// against Excel naming rules (blank falls back to the default name).
pub fn write_sheet_grid<P: AsRef<Path>>(
    path_file_out: P,
    grid: &[Vec<EnumCellValue>],
    sheet_name: &str,
) -> Result<(), SheetWriteError> {
    let path_file_out = path_file_out.as_ref().to_path_buf();

    let n_rows = grid.len();
    let n_cols = derive_grid_width(grid);
    if n_rows > N_NROWS_EXCEL_MAX || n_cols > N_NCOLS_EXCEL_MAX {
        return Err(SheetWriteError::GridTooLarge { n_rows, n_cols });
    }

    let c_sheet_name = if sheet_name.trim().is_empty() {
        C_SHEET_NAME_DEFAULT.to_string()
    } else {
        sanitize_sheet_name(sheet_name, "_")
    };

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&c_sheet_name)
        .map_err(|e| SheetWriteError::SaveFailed {
            path: path_file_out.clone(),
            message: derive_xlsx_error_text(e),
        })?;

    for (n_idx_row, l_cells_row) in grid.iter().enumerate() {
        for (n_idx_col, cell_value) in l_cells_row.iter().enumerate() {
            write_cell(worksheet, n_idx_row, n_idx_col, cell_value).map_err(|message| {
                SheetWriteError::SaveFailed {
                    path: path_file_out.clone(),
                    message,
                }
            })?;
        }
    }

    workbook
        .save(&path_file_out)
        .map_err(|e| SheetWriteError::SaveFailed {
            path: path_file_out,
            message: derive_xlsx_error_text(e),
        })?;

    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    cell_value: &EnumCellValue,
) -> Result<(), String> {
    match cell_value {
        EnumCellValue::None => {}
        EnumCellValue::String(value) => {
            worksheet
                .write_string(cast_row_num(row_idx)?, cast_col_num(col_idx)?, value)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Number(value) => {
            worksheet
                .write_number(cast_row_num(row_idx)?, cast_col_num(col_idx)?, *value)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}
