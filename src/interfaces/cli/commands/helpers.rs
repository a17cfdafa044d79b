//! Shared rendering and prompting helpers for CLI commands

use std::io::{self, BufRead, Write};

use chrono::Utc;
use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::models::{LinkRecord, LinkStatus, ServiceType, Strategy};

/// Parse a service type flag, with a readable error listing the options
pub fn parse_service_type(input: &str) -> Result<ServiceType, CliError> {
    input.parse().map_err(|_| {
        CliError::InputError(format!(
            "unknown service type '{}' (expected one of: general, imagebed, file, video, api)",
            input
        ))
    })
}

pub fn parse_status(input: &str) -> Result<LinkStatus, CliError> {
    input.parse().map_err(|_| {
        CliError::InputError(format!(
            "unknown status '{}' (expected one of: active, inactive, expired, deleted)",
            input
        ))
    })
}

pub fn parse_strategy(input: &str) -> Result<Strategy, CliError> {
    match input.parse() {
        Ok(Strategy::Unknown) | Err(_) => Err(CliError::InputError(format!(
            "unknown strategy '{}' (expected one of: round_robin, weighted, geo)",
            input
        ))),
        Ok(strategy) => Ok(strategy),
    }
}

/// Colored status badge matching the web dashboard's palette
pub fn status_badge(status: LinkStatus) -> String {
    match status {
        LinkStatus::Active => "active".green().to_string(),
        LinkStatus::Inactive => "inactive".yellow().to_string(),
        LinkStatus::Expired => "expired".red().to_string(),
        LinkStatus::Deleted => "deleted".dimmed().to_string(),
    }
}

/// One listing line: code, type, status, targets, visits, created
pub fn print_link_row(link: &LinkRecord) {
    let targets: Vec<&str> = link.targets.iter().map(|t| t.location()).collect();
    let mut parts = vec![format!(
        "{} [{}] {} -> {}",
        link.short_code.cyan(),
        link.service_type,
        status_badge(link.status),
        targets.join(", ").blue()
    )];

    if link.visit_count > 0 {
        parts.push(format!("(visits: {})", link.visit_count).dimmed().to_string());
    }
    if let Some(expire_at) = link.expire_at {
        let label = format!("(expires: {})", expire_at.format("%Y-%m-%d %H:%M UTC"));
        if expire_at < Utc::now() {
            parts.push(label.red().to_string());
        } else {
            parts.push(label.yellow().to_string());
        }
    }

    println!("  {}", parts.join(" "));
}

pub fn print_link_detail(link: &LinkRecord) {
    println!("{}", link.short_code.cyan().bold());
    println!("  type:     {}", link.service_type);
    println!("  status:   {}", status_badge(link.status));
    println!("  strategy: {}", link.strategy);
    for target in &link.targets {
        println!(
            "  target:   {} (weight {})",
            target.location().blue(),
            target.weight()
        );
    }
    println!("  visits:   {}", link.visit_count);
    println!("  created:  {}", link.created_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(updated_at) = link.updated_at {
        println!("  updated:  {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(expire_at) = link.expire_at {
        println!("  expires:  {}", expire_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(deleted_at) = link.deleted_at {
        println!("  deleted:  {}", deleted_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(description) = &link.description {
        println!("  note:     {}", description);
    }
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no
pub fn confirm(question: &str) -> Result<bool, CliError> {
    print!("{} [y/N] ", question);
    io::stdout()
        .flush()
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| CliError::CommandError(e.to_string()))?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
