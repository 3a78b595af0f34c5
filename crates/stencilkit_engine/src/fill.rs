//! Row consumption and output-file generation engine.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::conf::{C_FMT_FILE_STAMP, C_FMT_PROCESSED_AT, N_IDX_COL_ASSET, N_IDX_COL_CONTENT};
use crate::report::{ReportFill, ReportFillBuilder};
use crate::spec::{FillBatchError, SpecFillOptions, SpecFillProgress, SpecRowRecord};
use crate::util::{
    derive_replacements_per_file, generate_output_filename, replace_first_occurrence,
};

struct SpecRowSubstitution {
    text_content: String,
    text_asset: String,
    if_content_blank: bool,
}

struct SpecFillContext<'a> {
    path_dir_out: PathBuf,
    spec_fill_options: &'a SpecFillOptions,
    n_budget_per_file: usize,
    builder_fill_report: ReportFillBuilder,
    n_idx_row_cursor: usize,
    n_seq_file: usize,
}

/// Generate output files from `rows` against `template`.
///
/// Behavior is controlled by [`SpecFillOptions`], including:
/// - the per-file row budget policy (template-derived or fixed),
/// - the text/asset placeholder tokens.
///
/// Per output file the engine copies the template, then takes rows in sheet
/// order skipping already-consumed ones; each taken row replaces the first
/// remaining occurrence of each token kind (an empty content cell substitutes
/// an empty string and is recorded as a warning) and is marked consumed in
/// place, also when the row itself fails. A file is written only when at
/// least one row went into it; the run ends when no consumable row remains.
///
/// Returns [`ReportFill`] when the run completes (per-row and per-file
/// failures are stored in the report). Returns [`FillBatchError`] only for
/// validation and setup failures, which abort before anything is written.
pub fn fill_rows<P: AsRef<Path>>(
    rows: &mut [SpecRowRecord],
    template: &str,
    dir_output: P,
    spec_fill_options: &SpecFillOptions,
    mut on_progress: Option<&mut dyn FnMut(SpecFillProgress)>,
) -> Result<ReportFill, FillBatchError> {
    let n_budget_per_file = derive_replacements_per_file(
        template,
        spec_fill_options.rule_replacement_count,
        &spec_fill_options.token_text,
        &spec_fill_options.token_asset,
    )?;

    let path_dir_out = dir_output.as_ref().to_path_buf();
    fs::create_dir_all(&path_dir_out).map_err(|e| FillBatchError::OutputDirInitFailed {
        path: path_dir_out.clone(),
        message: e.to_string(),
    })?;

    let mut spec_fill_ctx = SpecFillContext {
        path_dir_out,
        spec_fill_options,
        n_budget_per_file,
        builder_fill_report: ReportFillBuilder {
            cnt_rows_total: rows.len() as u64,
            ..ReportFillBuilder::default()
        },
        n_idx_row_cursor: 0,
        n_seq_file: 1,
    };

    while spec_fill_ctx.n_idx_row_cursor < rows.len() {
        let mut buffer_file = template.to_string();
        let cnt_rows_this_file = consume_rows_for_file(rows, &mut buffer_file, &mut spec_fill_ctx);
        if cnt_rows_this_file == 0 {
            break;
        }

        if emit_output_file(&buffer_file, &mut spec_fill_ctx)
            && let Some(callback) = on_progress.as_deref_mut()
        {
            callback(SpecFillProgress {
                cnt_rows_consumed: rows.iter().filter(|r| r.is_consumed()).count(),
                cnt_rows_total: rows.len(),
                cnt_files_emitted: spec_fill_ctx.builder_fill_report.cnt_files_emitted as usize,
            });
        }

        if rows.iter().all(SpecRowRecord::is_consumed) {
            break;
        }
    }

    Ok(spec_fill_ctx.builder_fill_report.build())
}

fn consume_rows_for_file(
    rows: &mut [SpecRowRecord],
    buffer_file: &mut String,
    spec_fill_ctx: &mut SpecFillContext<'_>,
) -> usize {
    let mut cnt_rows_this_file = 0_usize;

    while cnt_rows_this_file < spec_fill_ctx.n_budget_per_file
        && spec_fill_ctx.n_idx_row_cursor < rows.len()
    {
        let n_idx_row = spec_fill_ctx.n_idx_row_cursor;
        if rows[n_idx_row].is_consumed() {
            spec_fill_ctx.builder_fill_report.add_skipped();
            spec_fill_ctx.n_idx_row_cursor += 1;
            continue;
        }

        match derive_row_substitution(&rows[n_idx_row]) {
            Ok(spec_row_subst) => {
                if spec_row_subst.if_content_blank {
                    spec_fill_ctx.builder_fill_report.add_warning(format!(
                        "Row {}: content cell is empty; substituted an empty string",
                        n_idx_row + 1
                    ));
                }
                replace_first_occurrence(
                    buffer_file,
                    &spec_fill_ctx.spec_fill_options.token_text,
                    &spec_row_subst.text_content,
                );
                replace_first_occurrence(
                    buffer_file,
                    &spec_fill_ctx.spec_fill_options.token_asset,
                    &spec_row_subst.text_asset,
                );
            }
            Err(message) => {
                spec_fill_ctx
                    .builder_fill_report
                    .add_error_row(n_idx_row, message);
            }
        }

        // Errored rows are consumed too and count against the file budget.
        let c_processed_at = Local::now().format(C_FMT_PROCESSED_AT).to_string();
        rows[n_idx_row].mark_consumed(&c_processed_at);
        spec_fill_ctx.builder_fill_report.add_consumed();
        cnt_rows_this_file += 1;
        spec_fill_ctx.n_idx_row_cursor += 1;
    }

    cnt_rows_this_file
}

fn derive_row_substitution(record_row: &SpecRowRecord) -> Result<SpecRowSubstitution, String> {
    let n_cols_required = usize::max(N_IDX_COL_CONTENT, N_IDX_COL_ASSET) + 1;
    if record_row.cells.len() < n_cols_required {
        return Err(format!(
            "Row has {} columns, content/asset columns require {n_cols_required}",
            record_row.cells.len()
        ));
    }

    let cell_content = &record_row.cells[N_IDX_COL_CONTENT];
    let if_content_blank = cell_content.is_blank();
    let text_content = if if_content_blank {
        String::new()
    } else {
        cell_content.to_display_text()
    };

    Ok(SpecRowSubstitution {
        text_content,
        text_asset: record_row.cells[N_IDX_COL_ASSET].to_display_text(),
        if_content_blank,
    })
}

fn emit_output_file(buffer_file: &str, spec_fill_ctx: &mut SpecFillContext<'_>) -> bool {
    let c_stamp = Local::now().format(C_FMT_FILE_STAMP).to_string();
    let path_file_out = spec_fill_ctx
        .path_dir_out
        .join(generate_output_filename(&c_stamp, spec_fill_ctx.n_seq_file));

    match fs::write(&path_file_out, buffer_file) {
        Ok(()) => {
            spec_fill_ctx.builder_fill_report.add_file_emitted();
            // Sequence numbers advance only past files that reached disk.
            spec_fill_ctx.n_seq_file += 1;
            true
        }
        Err(e) => {
            spec_fill_ctx
                .builder_fill_report
                .add_error_output(path_file_out, e.to_string());
            false
        }
    }
}
