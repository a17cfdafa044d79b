//! CLI interface module
//!
//! Thin command handlers over [`LinkConsole`]: each subcommand maps to one
//! controller method plus terminal rendering. No console logic lives here.

pub mod commands;

use std::fmt;

use crate::cli::{BatchCommands, Commands};
use crate::console::LinkConsole;
use crate::errors::ConsoleError;

#[derive(Debug)]
pub enum CliError {
    /// Bad operator input (unknown enum value, malformed flag)
    InputError(String),
    /// A console/gateway operation failed
    CommandError(String),
}

impl CliError {
    pub fn format_simple(&self) -> String {
        match self {
            CliError::InputError(msg) => format!("Input error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::InputError(msg) => {
                format!("{} {}", "Input error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<ConsoleError> for CliError {
    fn from(err: ConsoleError) -> Self {
        CliError::CommandError(err.format_simple())
    }
}

/// Dispatch one parsed command against the console
pub async fn run_cli_command(cmd: Commands, console: &mut LinkConsole) -> Result<(), CliError> {
    match cmd {
        Commands::List {
            page,
            filter,
            service_type,
            status,
        } => commands::list::run_list(console, page, filter, service_type, status).await,
        Commands::Show { short_code } => commands::list::run_show(console, &short_code).await,
        Commands::Create {
            service_type,
            target,
            targets_json,
            code,
            random_code,
            strategy,
            expire,
            description,
            enable_cache,
        } => {
            commands::create::run_create(
                console,
                commands::create::CreateArgs {
                    service_type,
                    target,
                    targets_json,
                    code,
                    random_code,
                    strategy,
                    expire,
                    description,
                    enable_cache,
                },
            )
            .await
        }
        Commands::Update {
            short_code,
            status,
            expire,
            strategy,
            description,
        } => {
            commands::update::run_update(console, &short_code, status, expire, strategy, description)
                .await
        }
        Commands::Remove { short_code, yes } => {
            commands::remove::run_remove(console, &short_code, yes).await
        }
        Commands::Trash { page } => commands::trash::run_trash(console, page).await,
        Commands::Restore { short_code } => {
            commands::trash::run_restore(console, &short_code).await
        }
        Commands::Purge { short_code } => commands::trash::run_purge(console, &short_code).await,
        Commands::Batch { action } => match action {
            BatchCommands::Delete { codes } => {
                commands::batch::run_batch_delete(console, codes).await
            }
            BatchCommands::Export { codes, output } => {
                commands::batch::run_batch_export(console, codes, output).await
            }
        },
        Commands::Import { file_path } => {
            commands::import_export::run_import(console, &file_path).await
        }
        Commands::Export { format, file_path } => {
            commands::import_export::run_export_all(console, &format, file_path).await
        }
        Commands::Search {
            code,
            service_type,
            status,
            from,
            to,
            min_visits,
            max_visits,
            page,
            page_size,
        } => {
            commands::search::run_search(
                console,
                commands::search::SearchArgs {
                    code,
                    service_type,
                    status,
                    from,
                    to,
                    min_visits,
                    max_visits,
                    page,
                    page_size,
                },
            )
            .await
        }
    }
}
