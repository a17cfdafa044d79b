//! Advanced search command

use colored::Colorize;

use crate::console::{LinkConsole, SearchForm};
use crate::interfaces::cli::CliError;

use super::helpers::{parse_service_type, parse_status, print_link_row};

pub struct SearchArgs {
    pub code: Option<String>,
    pub service_type: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub min_visits: Option<u64>,
    pub max_visits: Option<u64>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

pub async fn run_search(console: &mut LinkConsole, args: SearchArgs) -> Result<(), CliError> {
    let form = SearchForm {
        code: args.code.unwrap_or_default(),
        service_type: args
            .service_type
            .as_deref()
            .map(parse_service_type)
            .transpose()?,
        status: args.status.as_deref().map(parse_status).transpose()?,
        date_from: args.from.unwrap_or_default(),
        date_to: args.to.unwrap_or_default(),
        visit_min: args.min_visits.map(|n| n.to_string()).unwrap_or_default(),
        visit_max: args.max_visits.map(|n| n.to_string()).unwrap_or_default(),
        page: args.page,
        page_size: args.page_size,
    };

    let total = console.apply_search(&form).await?;

    if console.session.rows.is_empty() {
        println!("{} No matching links", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Search results:".bold().green());
    println!();
    for link in &console.session.rows {
        print_link_row(link);
    }
    println!();
    println!(
        "{} {} matches ({} shown)",
        "ℹ".bold().blue(),
        total.to_string().green(),
        console.session.rows.len()
    );
    Ok(())
}
