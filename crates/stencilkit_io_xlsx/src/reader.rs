//! XLSX reader kernel that materializes a worksheet into a cell grid.

use std::path::Path;

use umya_spreadsheet::{Cell, CellRawValue};

use crate::spec::{EnumCellValue, SheetReadError};
use crate::util::normalize_grid_width;

/// Read the first worksheet of `path_file_in` into a row-major cell grid.
///
/// The grid is headerless and rectangular (short rows are padded with
/// [`EnumCellValue::None`]). Cell normalization:
/// - numeric cells become [`EnumCellValue::Number`],
/// - boolean cells become the text `"True"` / `"False"`,
/// - absent or empty cells become [`EnumCellValue::None`],
/// - everything else becomes its display text.
pub fn read_sheet_grid<P: AsRef<Path>>(
    path_file_in: P,
) -> Result<Vec<Vec<EnumCellValue>>, SheetReadError> {
    let path_file_in = path_file_in.as_ref().to_path_buf();

    let book = umya_spreadsheet::reader::xlsx::read(&path_file_in).map_err(|e| {
        SheetReadError::FileUnreadable {
            path: path_file_in.clone(),
            message: e.to_string(),
        }
    })?;
    let Some(sheet) = book.get_sheet(&0) else {
        return Err(SheetReadError::NoWorksheet(path_file_in));
    };

    let (n_cols_max, n_rows_max) = sheet.get_highest_column_and_row();
    let mut grid: Vec<Vec<EnumCellValue>> = Vec::with_capacity(n_rows_max as usize);
    for n_idx_row in 1..=n_rows_max {
        let mut l_cells_row = Vec::with_capacity(n_cols_max as usize);
        for n_idx_col in 1..=n_cols_max {
            l_cells_row.push(convert_cell_to_value(
                sheet.get_cell((n_idx_col, n_idx_row)),
            ));
        }
        grid.push(l_cells_row);
    }

    normalize_grid_width(&mut grid);
    Ok(grid)
}

fn convert_cell_to_value(cell: Option<&Cell>) -> EnumCellValue {
    let Some(cell) = cell else {
        return EnumCellValue::None;
    };
    match cell.get_raw_value() {
        CellRawValue::Numeric(value) => EnumCellValue::Number(*value),
        CellRawValue::Bool(value) => {
            EnumCellValue::String(if *value { "True" } else { "False" }.to_string())
        }
        CellRawValue::Empty => EnumCellValue::None,
        _ => {
            let c_text = cell.get_value().to_string();
            if c_text.is_empty() {
                EnumCellValue::None
            } else {
                EnumCellValue::String(c_text)
            }
        }
    }
}
