//! Stateless helpers used by the fill engine.

use stencilkit_io_xlsx::EnumCellValue;

use crate::conf::{C_EXT_OUTPUT, N_NCOLS_TRACKED};
use crate::spec::{EnumReplacementCountMode, FillBatchError, SpecRowRecord};

////////////////////////////////////////////////////////////////////////////////
// #region TokenScanning

/// Count non-overlapping occurrences of `token` in `text`.
pub fn count_token_occurrences(text: &str, token: &str) -> usize {
    if token.is_empty() {
        return 0;
    }
    text.matches(token).count()
}

/// Replace the first occurrence of `token` in `buffer` with `value`.
///
/// Returns `false` when no occurrence remains.
pub fn replace_first_occurrence(buffer: &mut String, token: &str, value: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let Some(n_idx_start) = buffer.find(token) else {
        return false;
    };
    buffer.replace_range(n_idx_start..n_idx_start + token.len(), value);
    true
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region BudgetDerivation

/// Resolve the per-file row budget from the template and count policy.
///
/// `Fixed(n)` passes `n` through after a positivity check. `Dynamic` takes
/// the smaller token occurrence count and rejects templates where either
/// token kind is absent.
pub fn derive_replacements_per_file(
    template: &str,
    rule_replacement_count: EnumReplacementCountMode,
    token_text: &str,
    token_asset: &str,
) -> Result<usize, FillBatchError> {
    match rule_replacement_count {
        EnumReplacementCountMode::Fixed(n_fixed) => {
            if n_fixed <= 0 {
                return Err(FillBatchError::InvalidReplacementCount(format!(
                    "Fixed replacement count must be >= 1 (got {n_fixed})"
                )));
            }
            Ok(n_fixed as usize)
        }
        EnumReplacementCountMode::Dynamic => {
            let cnt_token_text = count_token_occurrences(template, token_text);
            let cnt_token_asset = count_token_occurrences(template, token_asset);
            let n_budget = usize::min(cnt_token_text, cnt_token_asset);
            if n_budget == 0 {
                return Err(FillBatchError::TokensNotFound {
                    cnt_token_text,
                    cnt_token_asset,
                });
            }
            Ok(n_budget)
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OutputNaming

/// Build an output file name from a second-resolution stamp and a 1-based
/// file sequence number.
pub fn generate_output_filename(stamp: &str, n_seq_file: usize) -> String {
    format!("{stamp}_{n_seq_file}.{C_EXT_OUTPUT}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridConversion

/// Wrap raw grid rows as row records, widening each to the tracked columns.
pub fn convert_grid_to_rows(grid: Vec<Vec<EnumCellValue>>) -> Vec<SpecRowRecord> {
    grid.into_iter()
        .map(|mut l_cells_row| {
            if l_cells_row.len() < N_NCOLS_TRACKED {
                l_cells_row.resize(N_NCOLS_TRACKED, EnumCellValue::None);
            }
            SpecRowRecord::new(l_cells_row)
        })
        .collect()
}

/// Unwrap row records back into a raw grid.
pub fn convert_rows_to_grid(rows: Vec<SpecRowRecord>) -> Vec<Vec<EnumCellValue>> {
    rows.into_iter().map(|record_row| record_row.cells).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
