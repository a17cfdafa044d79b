//! Update command

use colored::Colorize;

use crate::console::LinkConsole;
use crate::errors::ConsoleError;
use crate::gateway::UpdateLinkRequest;
use crate::interfaces::cli::CliError;
use crate::utils::TimeParser;

use super::helpers::{parse_status, parse_strategy};

pub async fn run_update(
    console: &mut LinkConsole,
    short_code: &str,
    status: Option<String>,
    expire: Option<String>,
    strategy: Option<String>,
    description: Option<String>,
) -> Result<(), CliError> {
    let mut request = UpdateLinkRequest::default();

    if let Some(status) = &status {
        request.status = Some(parse_status(status)?);
    }
    if let Some(expire) = &expire {
        let expires_at = TimeParser::parse_expire_time(expire)
            .map_err(ConsoleError::date_parse)
            .map_err(CliError::from)?;
        request.expires_at = Some(expires_at);
    }
    if let Some(strategy) = &strategy {
        request.strategy = Some(parse_strategy(strategy)?);
    }
    request.description = description;

    if request.status.is_none()
        && request.expires_at.is_none()
        && request.strategy.is_none()
        && request.description.is_none()
    {
        return Err(CliError::InputError(
            "nothing to update; pass at least one of --status/--expire/--strategy/--description"
                .into(),
        ));
    }

    let updated = console.update_link(short_code, &request).await?;
    println!(
        "{} Updated {} (status: {})",
        "✓".bold().green(),
        updated.short_code.cyan(),
        updated.status
    );
    Ok(())
}
