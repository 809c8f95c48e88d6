//! Report aggregation and rendering for scenario sweeps.
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Outcome of one scenario under one seed.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    pub seed: u64,
    pub passed: bool,
    /// Failure description when `passed` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub duration_ms: u128,
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a> {
    results: &'a [ScenarioResult],
    total: usize,
    failed: usize,
    elapsed_ms: u128,
}

/// Write the console report with colored pass/fail markers.
///
/// # Errors
///
/// Returns an error when the writer cannot be written to.
pub fn write_console(
    writer: &mut dyn Write,
    results: &[ScenarioResult],
    elapsed: Duration,
) -> std::io::Result<()> {
    for result in results {
        let marker = if result.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        writeln!(
            writer,
            "{marker} {:<20} seed {:<12} {:>6} ms",
            result.scenario, result.seed, result.duration_ms
        )?;
        if let Some(failure) = &result.failure {
            writeln!(writer, "     {}", failure.yellow())?;
        }
    }
    let failed = results.iter().filter(|result| !result.passed).count();
    let summary = format!(
        "{} scenarios, {} failed, {:.1}s",
        results.len(),
        failed,
        elapsed.as_secs_f32()
    );
    if failed == 0 {
        writeln!(writer, "{}", summary.green())?;
    } else {
        writeln!(writer, "{}", summary.red().bold())?;
    }
    Ok(())
}

/// Write the machine-readable JSON report.
///
/// # Errors
///
/// Returns an error when serialization or the underlying writer fails.
pub fn write_json(
    writer: &mut dyn Write,
    results: &[ScenarioResult],
    elapsed: Duration,
) -> anyhow::Result<()> {
    let envelope = ReportEnvelope {
        results,
        total: results.len(),
        failed: results.iter().filter(|result| !result.passed).count(),
        elapsed_ms: elapsed.as_millis(),
    };
    serde_json::to_writer_pretty(&mut *writer, &envelope)?;
    writeln!(writer)?;
    Ok(())
}
