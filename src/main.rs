use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use linkdeck::cli::Cli;
use linkdeck::config::ConsoleConfig;
use linkdeck::console::LinkConsole;
use linkdeck::gateway::{HttpGateway, LinkGateway, MemoryGateway};
use linkdeck::interfaces::cli::run_cli_command;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConsoleConfig::load()?;

    let gateway: Arc<dyn LinkGateway> = if config.offline() {
        warn!("no api.base_url configured; using in-memory demo gateway");
        Arc::new(MemoryGateway::demo())
    } else {
        info!(base_url = %config.api.base_url, "using management API");
        Arc::new(HttpGateway::new(
            &config.api.base_url,
            &config.api.key,
            Duration::from_secs(config.api.timeout_secs),
        )?)
    };

    let mut console = LinkConsole::new(gateway, config.display.page_size);

    if let Err(err) = run_cli_command(cli.command, &mut console).await {
        eprintln!("{}", err.format_colored());
        std::process::exit(1);
    }

    Ok(())
}
