//! Batch delete/export commands

use std::fs;

use chrono::Utc;
use colored::Colorize;

use crate::console::{BatchOutcome, LinkConsole};
use crate::interfaces::cli::CliError;

use super::helpers::confirm;

pub async fn run_batch_delete(
    console: &mut LinkConsole,
    codes: Vec<String>,
) -> Result<(), CliError> {
    let question = format!(
        "Soft-delete {} selected links? They can be restored from the trash.",
        codes.len()
    );
    if !confirm(&question)? {
        println!("{} Cancelled", "ℹ".bold().blue());
        return Ok(());
    }

    for code in &codes {
        console.toggle_selection(code);
    }
    let report = console.run_batch_delete().await?;

    for item in &report.errors {
        println!("{} {}: {}", "✗".bold().red(), item.code.cyan(), item.reason);
    }
    match report.outcome() {
        BatchOutcome::AllFailed => println!(
            "{} Batch delete failed: 0 of {} deleted",
            "✗".bold().red(),
            report.total
        ),
        _ => println!(
            "{} Deleted {} of {} links{}",
            "✓".bold().green(),
            report.success_count.to_string().green(),
            report.total,
            if report.failed_count > 0 {
                format!(", {} failed", report.failed_count.to_string().red())
            } else {
                String::new()
            }
        ),
    }
    Ok(())
}

pub async fn run_batch_export(
    console: &mut LinkConsole,
    codes: Vec<String>,
    output: Option<String>,
) -> Result<(), CliError> {
    for code in &codes {
        console.toggle_selection(code);
    }
    let export = console.run_batch_export().await?;

    for item in &export.report.errors {
        println!(
            "{} skipped {}: {}",
            "⚠".bold().yellow(),
            item.code.cyan(),
            item.reason
        );
    }

    let path = output.unwrap_or_else(|| {
        format!("links_export_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"))
    });
    fs::write(&path, export.csv.as_bytes())
        .map_err(|e| CliError::CommandError(format!("failed to write '{}': {}", path, e)))?;

    println!(
        "{} Exported {} of {} links to: {}",
        "✓".bold().green(),
        export.report.success_count.to_string().green(),
        export.report.total,
        path.cyan()
    );
    Ok(())
}
