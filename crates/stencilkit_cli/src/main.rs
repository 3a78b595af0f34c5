//! Stencilkit CLI - batch text generation from spreadsheet rows.
//!
//! Fills copies of a template file from unconsumed spreadsheet rows, then
//! writes the consumption state back into the sheet so the next invocation
//! resumes where this one stopped.

mod conf;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use stencilkit_engine::{
    EnumReplacementCountMode, ReportFill, SpecFillOptions, SpecFillProgress, process_batch,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::{SpecCliConfig, load_config, save_config};

/// Stencilkit CLI - fill template copies from spreadsheet rows.
#[derive(Debug, Parser)]
#[command(name = "stencilkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Source spreadsheet (.xlsx); falls back to the remembered path.
    #[arg(long, value_name = "FILE")]
    sheet: Option<PathBuf>,

    /// UTF-8 template file; falls back to the remembered path.
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Directory for generated files; falls back to the remembered path.
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Per-file row budget policy.
    #[arg(long, value_enum, default_value = "dynamic")]
    mode: EnumCountModeArg,

    /// Rows consumed per file when `--mode fixed`.
    #[arg(long, default_value_t = 1)]
    count: i64,

    /// Override the content placeholder token.
    #[arg(long, value_name = "TOKEN")]
    token_text: Option<String>,

    /// Override the asset-path placeholder token.
    #[arg(long, value_name = "TOKEN")]
    token_asset: Option<String>,

    /// Do not load or save remembered paths.
    #[arg(long)]
    no_config: bool,
}

/// Per-file row budget policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EnumCountModeArg {
    /// Derive the budget from template token counts.
    Dynamic,
    /// Consume a fixed number of rows per file.
    Fixed,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    execute(cli)
}

fn execute(cli: Cli) -> Result<()> {
    let Cli {
        sheet,
        template,
        output,
        mode,
        count,
        token_text,
        token_asset,
        no_config,
    } = cli;

    let config_loaded = if no_config {
        SpecCliConfig::default()
    } else {
        load_config()
    };

    let path_sheet = resolve_path_arg(sheet, config_loaded.excel_path.as_deref(), "--sheet")?;
    let path_template = resolve_path_arg(
        template,
        config_loaded.template_path.as_deref(),
        "--template",
    )?;
    let dir_output = resolve_path_arg(output, config_loaded.output_path.as_deref(), "--output")?;

    if !no_config {
        save_config(&SpecCliConfig {
            excel_path: Some(path_sheet.to_string_lossy().into_owned()),
            template_path: Some(path_template.to_string_lossy().into_owned()),
            output_path: Some(dir_output.to_string_lossy().into_owned()),
        });
    }

    let rule_replacement_count = match mode {
        EnumCountModeArg::Dynamic => EnumReplacementCountMode::Dynamic,
        EnumCountModeArg::Fixed => EnumReplacementCountMode::Fixed(count),
    };
    let mut spec_fill_options = SpecFillOptions {
        rule_replacement_count,
        ..SpecFillOptions::default()
    };
    if let Some(token) = token_text {
        spec_fill_options.token_text = token;
    }
    if let Some(token) = token_asset {
        spec_fill_options.token_asset = token;
    }

    info!(
        "Filling from {} with template {} into {}",
        path_sheet.display(),
        path_template.display(),
        dir_output.display()
    );

    let mut on_progress = |progress: SpecFillProgress| {
        info!(
            "Progress: {}/{} rows consumed, {} file(s) written",
            progress.cnt_rows_consumed, progress.cnt_rows_total, progress.cnt_files_emitted
        );
    };

    let report = process_batch(
        &path_sheet,
        &path_template,
        &dir_output,
        &spec_fill_options,
        Some(&mut on_progress),
    )
    .context("Batch run aborted")?;

    render_report(&report);
    Ok(())
}

fn resolve_path_arg(
    arg_path: Option<PathBuf>,
    config_path: Option<&str>,
    flag_name: &str,
) -> Result<PathBuf> {
    if let Some(path) = arg_path {
        return Ok(path);
    }
    if let Some(path) = config_path
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }
    bail!("Missing {flag_name} and no remembered value to fall back to");
}

fn render_report(report: &ReportFill) {
    for warning in &report.warnings {
        warn!("{warning}");
    }
    for error_row in &report.errors_row {
        warn!("Row {}: {}", error_row.idx_row + 1, error_row.exception);
    }
    for error_output in &report.errors_output {
        warn!(
            "Output {}: {}",
            error_output.path.display(),
            error_output.exception
        );
    }
    if let Some(message) = &report.error_persist {
        error!("Spreadsheet save failed, generated files were kept: {message}");
    }

    println!("{report}");
    println!("Done: {} file(s) generated.", report.cnt_files_emitted);
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from([
            "stencilkit",
            "--sheet",
            "rows.xlsx",
            "--template",
            "t.txt",
            "--output",
            "out",
        ]);

        assert_eq!(cli.sheet.as_deref(), Some(Path::new("rows.xlsx")));
        assert_eq!(cli.template.as_deref(), Some(Path::new("t.txt")));
        assert_eq!(cli.output.as_deref(), Some(Path::new("out")));
        assert_eq!(cli.mode, EnumCountModeArg::Dynamic);
        assert_eq!(cli.count, 1);
        assert!(!cli.no_config);
    }

    #[test]
    fn test_cli_parse_fixed_mode_and_token_overrides() {
        let cli = Cli::parse_from([
            "stencilkit",
            "--mode",
            "fixed",
            "--count",
            "3",
            "--token-text",
            "{{T}}",
            "--token-asset",
            "{{I}}",
            "--no-config",
        ]);

        assert_eq!(cli.mode, EnumCountModeArg::Fixed);
        assert_eq!(cli.count, 3);
        assert_eq!(cli.token_text.as_deref(), Some("{{T}}"));
        assert_eq!(cli.token_asset.as_deref(), Some("{{I}}"));
        assert!(cli.no_config);
    }

    #[test]
    fn test_resolve_path_arg_precedence() {
        let path = resolve_path_arg(
            Some(PathBuf::from("cli.xlsx")),
            Some("remembered.xlsx"),
            "--sheet",
        )
        .expect("flag wins");
        assert_eq!(path, PathBuf::from("cli.xlsx"));

        let path =
            resolve_path_arg(None, Some("remembered.xlsx"), "--sheet").expect("config fallback");
        assert_eq!(path, PathBuf::from("remembered.xlsx"));

        assert!(resolve_path_arg(None, None, "--sheet").is_err());
        assert!(resolve_path_arg(None, Some("   "), "--sheet").is_err());
    }
}
