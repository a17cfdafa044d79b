//! List and show commands

use colored::Colorize;

use crate::console::{LinkConsole, QuickFilter};
use crate::interfaces::cli::CliError;

use super::helpers::{parse_service_type, parse_status, print_link_detail, print_link_row};

pub async fn run_list(
    console: &mut LinkConsole,
    page: u64,
    filter: Option<String>,
    service_type: Option<String>,
    status: Option<String>,
) -> Result<(), CliError> {
    let quick = QuickFilter {
        keyword: filter.unwrap_or_default(),
        service_type: service_type.as_deref().map(parse_service_type).transpose()?,
        status: status.as_deref().map(parse_status).transpose()?,
    };
    let filtered = !quick.is_empty();
    console.set_quick_filter(if filtered { Some(quick) } else { None });

    console.goto_page(page).await?;

    let rows = console.session.visible_rows();
    if rows.is_empty() {
        println!("{} No links found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Links:".bold().green());
    println!();
    for link in &rows {
        print_link_row(link);
    }
    println!();
    if filtered {
        println!(
            "{} Showing {} of {} on page {} (quick filter active), {} total",
            "ℹ".bold().blue(),
            rows.len().to_string().green(),
            console.session.rows.len(),
            console.session.page,
            console.session.total
        );
    } else {
        println!(
            "{} Page {} ({} links, {} total)",
            "ℹ".bold().blue(),
            console.session.page,
            rows.len().to_string().green(),
            console.session.total
        );
    }
    Ok(())
}

pub async fn run_show(console: &mut LinkConsole, short_code: &str) -> Result<(), CliError> {
    let link = console.get_link(short_code).await?;
    print_link_detail(&link);
    Ok(())
}
