//! Command-line interface definitions using clap
//!
//! This module only defines the CLI structure; command implementations
//! live in `interfaces::cli::commands`.

use clap::{Parser, Subcommand};

/// Linkdeck - operator console for a short-link redirect service
#[derive(Parser)]
#[command(name = "linkdeck")]
#[command(version)]
#[command(about = "Operator console for a short-link redirect service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List links (current page, with optional quick filter)
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u64,

        /// Quick filter: substring over code, description and targets
        #[arg(long)]
        filter: Option<String>,

        /// Quick filter: service type (general, imagebed, file, video, api)
        #[arg(long = "type")]
        service_type: Option<String>,

        /// Quick filter: status (active, inactive, expired, deleted)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show one link in full
    Show {
        /// Short code to look up
        short_code: String,
    },

    /// Create a link through the three-step wizard
    Create {
        /// Service type (general, imagebed, file, video, api)
        #[arg(long = "type")]
        service_type: String,

        /// Target URL (general) or resource path (other types)
        #[arg(long)]
        target: Option<String>,

        /// Raw JSON target list (advanced multi-target mode)
        #[arg(long, conflicts_with = "target")]
        targets_json: Option<String>,

        /// Custom short code (server generates one if omitted)
        #[arg(long)]
        code: Option<String>,

        /// Generate a random 12-character code client-side
        #[arg(long, conflicts_with = "code")]
        random_code: bool,

        /// Distribution strategy (round_robin, weighted, geo)
        #[arg(long)]
        strategy: Option<String>,

        /// Expiration (RFC3339 or relative like "7d", "12h")
        #[arg(long)]
        expire: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Enable edge caching for this link
        #[arg(long)]
        enable_cache: bool,
    },

    /// Update fields of an existing link
    Update {
        short_code: String,

        /// New status (active, inactive)
        #[arg(long)]
        status: Option<String>,

        /// New expiration (RFC3339 or relative)
        #[arg(long)]
        expire: Option<String>,

        /// New distribution strategy
        #[arg(long)]
        strategy: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Soft-delete a link (recoverable from trash)
    Remove {
        short_code: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// List soft-deleted links
    Trash {
        #[arg(long, default_value_t = 1)]
        page: u64,
    },

    /// Restore a soft-deleted link
    Restore {
        short_code: String,
    },

    /// Permanently delete a soft-deleted link (asks twice; irreversible)
    Purge {
        short_code: String,
    },

    /// Batch operations over an explicit code list
    Batch {
        #[command(subcommand)]
        action: BatchCommands,
    },

    /// Import links from a CSV or JSON file
    Import {
        /// Input file path (.csv or .json)
        file_path: String,
    },

    /// Download the server-side full export
    Export {
        /// Output format (csv or json)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Output file path (default: generated name)
        file_path: Option<String>,
    },

    /// Advanced search with structured filters
    Search {
        /// Short code substring
        #[arg(long)]
        code: Option<String>,

        #[arg(long = "type")]
        service_type: Option<String>,

        #[arg(long)]
        status: Option<String>,

        /// Created-at lower bound (YYYY-MM-DD or RFC3339)
        #[arg(long)]
        from: Option<String>,

        /// Created-at upper bound (YYYY-MM-DD or RFC3339)
        #[arg(long)]
        to: Option<String>,

        #[arg(long)]
        min_visits: Option<u64>,

        #[arg(long)]
        max_visits: Option<u64>,

        #[arg(long)]
        page: Option<u64>,

        #[arg(long)]
        page_size: Option<u64>,
    },
}

/// Batch subcommands
#[derive(Subcommand)]
pub enum BatchCommands {
    /// Soft-delete every listed code, tolerating per-item failure
    Delete {
        #[arg(required = true)]
        codes: Vec<String>,
    },

    /// Export full records of the listed codes to one CSV file
    Export {
        #[arg(required = true)]
        codes: Vec<String>,

        /// Output file path (default: generated name)
        #[arg(long)]
        output: Option<String>,
    },
}
