//! Trash commands: listing, restore, purge

use colored::Colorize;

use crate::console::{DoubleConfirmation, LinkConsole};
use crate::interfaces::cli::CliError;

use super::helpers::{confirm, print_link_row};

pub async fn run_trash(console: &mut LinkConsole, page: u64) -> Result<(), CliError> {
    let links = console.trash_page(page).await?;
    if links.is_empty() {
        println!("{} Trash is empty", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Trash:".bold().green());
    println!();
    for link in &links {
        print_link_row(link);
    }
    println!();
    println!(
        "{} {} deleted links on page {}",
        "ℹ".bold().blue(),
        links.len().to_string().green(),
        page
    );
    Ok(())
}

pub async fn run_restore(console: &mut LinkConsole, short_code: &str) -> Result<(), CliError> {
    let restored = console.restore(short_code).await?;
    println!(
        "{} Link {} restored (status: {})",
        "✓".bold().green(),
        restored.short_code.cyan(),
        restored.status
    );
    Ok(())
}

/// Permanent deletion asks twice, separately, before anything is sent
pub async fn run_purge(console: &mut LinkConsole, short_code: &str) -> Result<(), CliError> {
    println!(
        "{} Permanently deleting '{}' removes the record and all of its\n  analytics. This cannot be undone.",
        "⚠".bold().yellow(),
        short_code.cyan()
    );

    let mut confirmation = DoubleConfirmation::none();
    if confirm(&format!("Permanently delete '{}'?", short_code))? {
        confirmation.acknowledge();
    } else {
        println!("{} Cancelled", "ℹ".bold().blue());
        return Ok(());
    }
    if confirm("Final confirmation: really delete forever?")? {
        confirmation.acknowledge();
    } else {
        println!("{} Cancelled", "ℹ".bold().blue());
        return Ok(());
    }

    console.purge(short_code, confirmation).await?;
    println!(
        "{} Link {} permanently deleted",
        "✓".bold().green(),
        short_code.cyan()
    );
    Ok(())
}
