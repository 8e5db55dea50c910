use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use schemagen_codegen::{GenerationPipeline, TargetResult, run_targets};
use schemagen_core::TargetsFile;
use schemagen_validator::{CodeValidator, FileReportSink, ReportSink, RuleIgnoreSet, ValidationReport};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs every target in `config` and prints one line per target.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or any target failed.
pub async fn handle_generate(
    config: &Path,
    cancel: &CancellationToken,
    out: &mut dyn Write,
) -> Result<()> {
    let file = TargetsFile::load(config)?;
    info!(
        "Loaded {} target(s) from {}",
        file.targets.len(),
        config.display()
    );

    let pipeline = GenerationPipeline::standard()?;
    let results = run_targets(&pipeline, &file.targets, cancel).await;
    let failed = write_summary(&results, out)?;
    if failed > 0 {
        bail!("{failed} of {} target(s) failed", results.len());
    }
    Ok(())
}

/// Prints one line per target; returns how many failed.
fn write_summary(results: &[TargetResult], out: &mut dyn Write) -> Result<usize> {
    let mut failed = 0;
    for (index, result) in results.iter().enumerate() {
        match result {
            Ok(outcome) => {
                let warnings = outcome.report.warnings().count();
                writeln!(
                    out,
                    "Target #{index}: wrote {} ({warnings} warning(s))",
                    outcome.path.display()
                )?;
            }
            Err(err) => {
                failed += 1;
                writeln!(out, "{err}")?;
            }
        }
    }
    Ok(failed)
}

/// Validates `file` and prints the report as JSON.
///
/// # Errors
/// Returns an error if the file cannot be read or validation failed.
pub async fn handle_validate(
    file: &Path,
    ignore: &[String],
    language: &str,
    report_file: Option<&Path>,
    out: &mut dyn Write,
) -> Result<()> {
    let source = fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let ignore_set: RuleIgnoreSet = ignore.iter().collect();
    let sink = report_file.map(FileReportSink::new);
    let report = CodeValidator::default().validate(
        &source,
        &ignore_set,
        language,
        sink.as_ref().map(|file_sink| file_sink as &dyn ReportSink),
    );

    write_report(&report, out)?;
    if !report.passed() {
        bail!("{} failed validation: {report}", file.display());
    }
    Ok(())
}

fn write_report(report: &ValidationReport, out: &mut dyn Write) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json}")?;
    Ok(())
}
