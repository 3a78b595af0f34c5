//! End-to-end batch orchestration: read inputs, fill, persist row state.

use std::fs;
use std::path::Path;

use stencilkit_io_xlsx::{C_SHEET_NAME_DEFAULT, read_sheet_grid, write_sheet_grid};

use crate::fill::fill_rows;
use crate::report::ReportFill;
use crate::spec::{FillBatchError, SpecFillOptions, SpecFillProgress};
use crate::util::{convert_grid_to_rows, convert_rows_to_grid};

/// Run one full batch: spreadsheet in, output files out, spreadsheet back.
///
/// Reads the first worksheet of `path_sheet` and the UTF-8 template at
/// `path_template`, runs [`fill_rows`] into `dir_output`, then overwrites
/// `path_sheet` with the updated row state. The overwritten sheet is the only
/// persistence: a later run resumes from the rows still unmarked.
///
/// Returns [`ReportFill`] when the run completes; a failed final save is
/// recorded in [`ReportFill::error_persist`] (the generated files stay on
/// disk). Returns [`FillBatchError`] only when reading, validation or setup
/// fails before anything is written.
pub fn process_batch<P, Q, R>(
    path_sheet: P,
    path_template: Q,
    dir_output: R,
    spec_fill_options: &SpecFillOptions,
    on_progress: Option<&mut dyn FnMut(SpecFillProgress)>,
) -> Result<ReportFill, FillBatchError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let path_sheet = path_sheet.as_ref().to_path_buf();
    let grid = read_sheet_grid(&path_sheet).map_err(|e| FillBatchError::SpreadsheetReadFailed {
        path: path_sheet.clone(),
        message: e.to_string(),
    })?;

    let path_template = path_template.as_ref().to_path_buf();
    let template =
        fs::read_to_string(&path_template).map_err(|e| FillBatchError::TemplateReadFailed {
            path: path_template,
            message: e.to_string(),
        })?;

    let mut rows = convert_grid_to_rows(grid);
    let mut report_fill = fill_rows(
        &mut rows,
        &template,
        dir_output,
        spec_fill_options,
        on_progress,
    )?;

    let grid_updated = convert_rows_to_grid(rows);
    if let Err(e) = write_sheet_grid(&path_sheet, &grid_updated, C_SHEET_NAME_DEFAULT) {
        report_fill.error_persist = Some(e.to_string());
    }

    Ok(report_fill)
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use stencilkit_io_xlsx::EnumCellValue;

    use super::*;
    use crate::conf::{N_IDX_COL_PROCESSED_AT, N_IDX_COL_STATUS, N_NCOLS_TRACKED};
    use crate::spec::EnumReplacementCountMode;

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!("stencilkit_batch_test_{n}"));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    fn write_text(path: &Path, txt: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, txt).expect("write text");
    }

    fn write_sheet(path: &Path, rows: &[(&str, &str)]) {
        let grid: Vec<Vec<EnumCellValue>> = rows
            .iter()
            .enumerate()
            .map(|(n_idx, (content, asset))| {
                vec![
                    EnumCellValue::Number((n_idx + 1) as f64),
                    EnumCellValue::String((*content).to_string()),
                    EnumCellValue::String((*asset).to_string()),
                ]
            })
            .collect();
        write_sheet_grid(path, &grid, C_SHEET_NAME_DEFAULT).expect("write fixture sheet");
    }

    fn count_outputs(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .expect("read output dir")
            .map(|entry| entry.expect("dir entry").path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .count()
    }

    #[test]
    fn process_batch_smoke() {
        let tmp = TestDir::new();
        let path_sheet = tmp.path().join("rows.xlsx");
        let path_template = tmp.path().join("template.txt");
        let dir_out = tmp.path().join("out");

        write_sheet(
            &path_sheet,
            &[("hello", "/img1.png"), ("world", "/img2.png")],
        );
        write_text(&path_template, "A: 文案, B: 图片");

        let spec_fill_options = SpecFillOptions {
            rule_replacement_count: EnumReplacementCountMode::Fixed(1),
            ..SpecFillOptions::default()
        };
        let report = process_batch(&path_sheet, &path_template, &dir_out, &spec_fill_options, None)
            .expect("batch run");

        assert_eq!(report.cnt_files_emitted, 2);
        assert_eq!(report.cnt_rows_consumed, 2);
        assert!(report.error_persist.is_none());
        assert_eq!(count_outputs(&dir_out), 2);

        // The source sheet now carries the consumption state.
        let grid_after = read_sheet_grid(&path_sheet).expect("re-read sheet");
        assert_eq!(grid_after.len(), 2);
        for l_cells_row in &grid_after {
            assert_eq!(l_cells_row.len(), N_NCOLS_TRACKED);
            assert_eq!(
                l_cells_row[N_IDX_COL_STATUS],
                EnumCellValue::String("done".to_string())
            );
            assert!(!l_cells_row[N_IDX_COL_PROCESSED_AT].is_blank());
        }
    }

    #[test]
    fn process_batch_rerun_emits_nothing_and_preserves_sheet() {
        let tmp = TestDir::new();
        let path_sheet = tmp.path().join("rows.xlsx");
        let path_template = tmp.path().join("template.txt");
        let dir_out = tmp.path().join("out");

        write_sheet(&path_sheet, &[("hello", "/img1.png")]);
        write_text(&path_template, "A: 文案, B: 图片");

        let spec_fill_options = SpecFillOptions::default();
        process_batch(&path_sheet, &path_template, &dir_out, &spec_fill_options, None)
            .expect("first run");
        let grid_first = read_sheet_grid(&path_sheet).expect("read sheet");
        let cnt_outputs_first = count_outputs(&dir_out);

        let report_rerun =
            process_batch(&path_sheet, &path_template, &dir_out, &spec_fill_options, None)
                .expect("second run");

        assert_eq!(report_rerun.cnt_files_emitted, 0);
        assert_eq!(report_rerun.cnt_rows_consumed, 0);
        assert_eq!(report_rerun.cnt_rows_skipped, 1);
        assert_eq!(count_outputs(&dir_out), cnt_outputs_first);
        assert_eq!(read_sheet_grid(&path_sheet).expect("re-read sheet"), grid_first);
    }

    #[test]
    fn process_batch_dynamic_budget_spans_files() {
        let tmp = TestDir::new();
        let path_sheet = tmp.path().join("rows.xlsx");
        let path_template = tmp.path().join("template.txt");
        let dir_out = tmp.path().join("out");

        write_sheet(
            &path_sheet,
            &[("one", "/1.png"), ("two", "/2.png"), ("three", "/3.png")],
        );
        write_text(&path_template, "T:文案 I:图片 T:文案 I:图片");

        // Budget 2: rows one/two fill the first file, row three the second.
        let report = process_batch(
            &path_sheet,
            &path_template,
            &dir_out,
            &SpecFillOptions::default(),
            None,
        )
        .expect("batch run");

        assert_eq!(report.cnt_files_emitted, 2);
        assert_eq!(report.cnt_rows_consumed, 3);
        assert_eq!(count_outputs(&dir_out), 2);
    }

    #[test]
    fn process_batch_resumes_from_marked_sheet() {
        let tmp = TestDir::new();
        let path_sheet = tmp.path().join("rows.xlsx");
        let path_template = tmp.path().join("template.txt");
        let dir_out = tmp.path().join("out");

        // Row one is already marked, as a previous run would leave it.
        let grid = vec![
            vec![
                EnumCellValue::Number(1.0),
                EnumCellValue::String("stale".to_string()),
                EnumCellValue::String("/stale.png".to_string()),
                EnumCellValue::String("done".to_string()),
                EnumCellValue::String("2024-01-01 00:00:00".to_string()),
            ],
            vec![
                EnumCellValue::Number(2.0),
                EnumCellValue::String("fresh".to_string()),
                EnumCellValue::String("/fresh.png".to_string()),
                EnumCellValue::None,
                EnumCellValue::None,
            ],
        ];
        write_sheet_grid(&path_sheet, &grid, C_SHEET_NAME_DEFAULT).expect("write fixture sheet");
        write_text(&path_template, "A: 文案, B: 图片");

        let report = process_batch(
            &path_sheet,
            &path_template,
            &dir_out,
            &SpecFillOptions::default(),
            None,
        )
        .expect("batch run");

        assert_eq!(report.cnt_rows_skipped, 1);
        assert_eq!(report.cnt_rows_consumed, 1);
        assert_eq!(report.cnt_files_emitted, 1);

        let grid_after = read_sheet_grid(&path_sheet).expect("re-read sheet");
        assert_eq!(
            grid_after[0][N_IDX_COL_PROCESSED_AT],
            EnumCellValue::String("2024-01-01 00:00:00".to_string())
        );
        assert_eq!(
            grid_after[1][N_IDX_COL_STATUS],
            EnumCellValue::String("done".to_string())
        );
    }

    #[test]
    fn process_batch_missing_sheet_rejected() {
        let tmp = TestDir::new();
        let path_template = tmp.path().join("template.txt");
        write_text(&path_template, "A: 文案, B: 图片");

        let err = process_batch(
            tmp.path().join("absent.xlsx"),
            &path_template,
            tmp.path().join("out"),
            &SpecFillOptions::default(),
            None,
        )
        .expect_err("must fail");

        assert!(matches!(err, FillBatchError::SpreadsheetReadFailed { .. }));
    }

    #[test]
    fn process_batch_missing_template_rejected() {
        let tmp = TestDir::new();
        let path_sheet = tmp.path().join("rows.xlsx");
        write_sheet(&path_sheet, &[("hello", "/img.png")]);

        let err = process_batch(
            &path_sheet,
            tmp.path().join("absent.txt"),
            tmp.path().join("out"),
            &SpecFillOptions::default(),
            None,
        )
        .expect_err("must fail");

        assert!(matches!(err, FillBatchError::TemplateReadFailed { .. }));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn process_batch_persist_failure_recorded_and_outputs_kept() {
        let tmp = TestDir::new();
        let path_sheet = tmp.path().join("rows.xlsx");
        let path_template = tmp.path().join("template.txt");
        let dir_out = tmp.path().join("out");

        write_sheet(&path_sheet, &[("hello", "/img.png")]);
        write_text(&path_template, "A: 文案, B: 图片");

        // The sheet is fully read before any file is emitted, so the
        // callback can swap the sheet path for a directory and doom the
        // final save.
        let mut on_progress = |_: SpecFillProgress| {
            std::fs::remove_file(&path_sheet).expect("remove sheet");
            std::fs::create_dir(&path_sheet).expect("block sheet path");
        };

        let report = process_batch(
            &path_sheet,
            &path_template,
            &dir_out,
            &SpecFillOptions::default(),
            Some(&mut on_progress),
        )
        .expect("batch run");

        assert!(report.error_persist.is_some());
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.cnt_files_emitted, 1);
        // The generated file stays on disk even though the save failed.
        assert_eq!(count_outputs(&dir_out), 1);
    }

    #[test]
    fn process_batch_widens_narrow_sheets_to_tracked_columns() {
        let tmp = TestDir::new();
        let path_sheet = tmp.path().join("rows.xlsx");
        let path_template = tmp.path().join("template.txt");
        let dir_out = tmp.path().join("out");

        // Three columns only; the consumption columns do not exist yet.
        write_sheet(&path_sheet, &[("hello", "/img.png")]);
        write_text(&path_template, "A: 文案, B: 图片");

        process_batch(
            &path_sheet,
            &path_template,
            &dir_out,
            &SpecFillOptions::default(),
            None,
        )
        .expect("batch run");

        let grid_after = read_sheet_grid(&path_sheet).expect("re-read sheet");
        assert_eq!(grid_after[0].len(), N_NCOLS_TRACKED);
        assert_eq!(grid_after[0][0].to_display_text(), "1");
    }

    #[test]
    fn process_batch_reports_progress() {
        let tmp = TestDir::new();
        let path_sheet = tmp.path().join("rows.xlsx");
        let path_template = tmp.path().join("template.txt");
        let dir_out = tmp.path().join("out");

        write_sheet(
            &path_sheet,
            &[("hello", "/img1.png"), ("world", "/img2.png")],
        );
        write_text(&path_template, "A: 文案, B: 图片");

        let mut l_progress: Vec<SpecFillProgress> = Vec::new();
        let mut on_progress = |progress: SpecFillProgress| l_progress.push(progress);

        process_batch(
            &path_sheet,
            &path_template,
            &dir_out,
            &SpecFillOptions::default(),
            Some(&mut on_progress),
        )
        .expect("batch run");

        assert_eq!(l_progress.len(), 2);
        assert_eq!(l_progress[1].cnt_rows_consumed, 2);
        assert_eq!(l_progress[1].cnt_files_emitted, 2);
    }
}
