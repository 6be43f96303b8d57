//! Average age command handler

use prodev::ProdevConfig;
use std::io::Write;

use crate::error::CliError;

pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(average) => format!("Average age of users: {:.2}", average),
        None => "No users found.".to_string(),
    }
}

pub async fn run_average_age<W: Write>(
    out: &mut W,
    config: &ProdevConfig,
) -> Result<(), CliError> {
    let (_, service) = super::connect(config).await?;

    let average = service.average_age().await?;
    writeln!(out, "{}", format_average(average))?;

    Ok(())
}
