//! Import and export commands

use std::fs;
use std::path::Path;

use chrono::Utc;
use colored::Colorize;

use crate::console::LinkConsole;
use crate::gateway::ExportFormat;
use crate::interfaces::cli::CliError;

pub async fn run_import(console: &mut LinkConsole, file_path: &str) -> Result<(), CliError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(CliError::CommandError(format!(
            "import file not found: {}",
            file_path
        )));
    }

    let summary = console.import_file(path).await?;

    println!(
        "{} Import finished: {} succeeded, {} failed, {} total",
        "✓".bold().green(),
        summary.success_count.to_string().green(),
        summary.failed_count.to_string().red(),
        summary.total
    );
    Ok(())
}

pub async fn run_export_all(
    console: &mut LinkConsole,
    format: &str,
    file_path: Option<String>,
) -> Result<(), CliError> {
    let format = match format.to_lowercase().as_str() {
        "csv" => ExportFormat::Csv,
        "json" => ExportFormat::Json,
        other => {
            return Err(CliError::InputError(format!(
                "unknown export format '{}' (expected csv or json)",
                other
            )));
        }
    };

    let bytes = console.export_all(format).await?;

    let path = file_path.unwrap_or_else(|| {
        format!(
            "links_full_export_{}.{}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            format.as_str()
        )
    });
    fs::write(&path, &bytes)
        .map_err(|e| CliError::CommandError(format!("failed to write '{}': {}", path, e)))?;

    println!(
        "{} Wrote {} bytes to: {}",
        "✓".bold().green(),
        bytes.len().to_string().green(),
        path.cyan()
    );
    Ok(())
}
