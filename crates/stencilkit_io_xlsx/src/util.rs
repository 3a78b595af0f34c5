//! Stateless helper utilities used by the XLSX kernels.

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL};
use crate::spec::EnumCellValue;

////////////////////////////////////////////////////////////////////////////////
// #region SheetNaming

/// Replace Excel-illegal characters and clamp the name to the length limit.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridShape

/// Widest row length in `grid` (zero for an empty grid).
pub fn derive_grid_width(grid: &[Vec<EnumCellValue>]) -> usize {
    grid.iter().map(Vec::len).max().unwrap_or(0)
}

/// Pad every row with `None` cells until the grid is rectangular.
pub fn normalize_grid_width(grid: &mut [Vec<EnumCellValue>]) {
    let n_width = derive_grid_width(grid);
    for l_cells_row in grid.iter_mut() {
        if l_cells_row.len() < n_width {
            l_cells_row.resize(n_width, EnumCellValue::None);
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_sheet_name_replaces_illegal_and_clamps() {
        assert_eq!(sanitize_sheet_name("a/b:c", "_"), "a_b_c");
        assert_eq!(sanitize_sheet_name("  padded  ", "_"), "padded");
        assert_eq!(sanitize_sheet_name("***", "_"), "___");
        assert_eq!(sanitize_sheet_name("", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name("   ", "_"), "Sheet");

        let c_long = "x".repeat(64);
        assert_eq!(
            sanitize_sheet_name(&c_long, "_").chars().count(),
            N_LEN_EXCEL_SHEET_NAME_MAX
        );
    }

    #[test]
    fn test_derive_grid_width_takes_widest_row() {
        assert_eq!(derive_grid_width(&[]), 0);

        let grid = vec![
            vec![EnumCellValue::None],
            vec![
                EnumCellValue::String("a".to_string()),
                EnumCellValue::Number(1.0),
                EnumCellValue::None,
            ],
            vec![],
        ];
        assert_eq!(derive_grid_width(&grid), 3);
    }

    #[test]
    fn test_normalize_grid_width_pads_short_rows() {
        let mut grid = vec![
            vec![EnumCellValue::String("a".to_string())],
            vec![
                EnumCellValue::String("b".to_string()),
                EnumCellValue::Number(2.0),
            ],
        ];

        normalize_grid_width(&mut grid);

        assert_eq!(grid[0].len(), 2);
        assert_eq!(grid[0][1], EnumCellValue::None);
        assert_eq!(grid[1].len(), 2);
    }

    #[test]
    fn test_cell_display_text_and_blankness() {
        assert_eq!(EnumCellValue::None.to_display_text(), "");
        assert_eq!(
            EnumCellValue::String("hello".to_string()).to_display_text(),
            "hello"
        );
        assert_eq!(EnumCellValue::Number(7.0).to_display_text(), "7");
        assert_eq!(EnumCellValue::Number(-3.0).to_display_text(), "-3");
        assert_eq!(EnumCellValue::Number(2.5).to_display_text(), "2.5");

        assert!(EnumCellValue::None.is_blank());
        assert!(EnumCellValue::String("   ".to_string()).is_blank());
        assert!(!EnumCellValue::String("x".to_string()).is_blank());
        assert!(!EnumCellValue::Number(0.0).is_blank());
    }
}
