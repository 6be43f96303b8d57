//! Seed command handler

use prodev::ProdevConfig;
use prodev::seed::SeedReport;
use std::io::Write;
use std::path::PathBuf;

use crate::error::CliError;

pub fn describe(report: &SeedReport, csv_path: &std::path::Path) -> String {
    if report.csv_found {
        format!(
            "Inserted {} new rows into user_data ({}): {} parsed, {} skipped",
            report.inserted, report.backend, report.parsed, report.skipped
        )
    } else {
        format!(
            "CSV file not found: {} -- table created only ({})",
            csv_path.display(),
            report.backend
        )
    }
}

pub async fn run_seed<W: Write>(
    out: &mut W,
    config: &ProdevConfig,
    csv: Option<PathBuf>,
) -> Result<(), CliError> {
    let csv_path = csv.unwrap_or_else(|| config.csv_path.clone());
    let (store, _) = super::connect(config).await?;

    let report = prodev::seed(&store, &csv_path).await?;
    writeln!(out, "{}", describe(&report, &csv_path))?;

    Ok(())
}
