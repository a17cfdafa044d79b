//! Soft-delete command

use colored::Colorize;

use crate::console::LinkConsole;
use crate::interfaces::cli::CliError;

use super::helpers::confirm;

pub async fn run_remove(
    console: &mut LinkConsole,
    short_code: &str,
    yes: bool,
) -> Result<(), CliError> {
    if !yes {
        let question = format!(
            "Soft-delete link '{}'? It can be restored from the trash.",
            short_code
        );
        if !confirm(&question)? {
            println!("{} Cancelled", "ℹ".bold().blue());
            return Ok(());
        }
    }

    console.soft_delete(short_code).await?;
    println!(
        "{} Link {} moved to trash",
        "✓".bold().green(),
        short_code.cyan()
    );
    Ok(())
}
