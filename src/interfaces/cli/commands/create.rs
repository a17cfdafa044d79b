//! Create command: drives the three-step wizard non-interactively

use colored::Colorize;

use crate::console::LinkConsole;
use crate::interfaces::cli::CliError;

use super::helpers::{parse_service_type, parse_strategy};

pub struct CreateArgs {
    pub service_type: String,
    pub target: Option<String>,
    pub targets_json: Option<String>,
    pub code: Option<String>,
    pub random_code: bool,
    pub strategy: Option<String>,
    pub expire: Option<String>,
    pub description: Option<String>,
    pub enable_cache: bool,
}

pub async fn run_create(console: &mut LinkConsole, args: CreateArgs) -> Result<(), CliError> {
    console.reset_wizard();

    // Step 1: service type
    console.wizard.draft_mut().service_type = Some(parse_service_type(&args.service_type)?);
    console.next_step()?;

    // Step 2: target (simple single-target, or raw-JSON multi-target)
    match (&args.target, &args.targets_json) {
        (_, Some(raw)) => {
            let draft = console.wizard.draft_mut();
            draft.advanced_mode = true;
            draft.targets_json = raw.clone();
        }
        (Some(target), None) => {
            console.wizard.draft_mut().target_input = target.clone();
        }
        (None, None) => {
            return Err(CliError::InputError(
                "either --target or --targets-json is required".into(),
            ));
        }
    }
    console.next_step()?;

    // Step 3: optional fields
    {
        let draft = console.wizard.draft_mut();
        if let Some(code) = &args.code {
            draft.short_code = code.clone();
        }
        if let Some(expire) = &args.expire {
            draft.expire_input = expire.clone();
        }
        if let Some(description) = &args.description {
            draft.description = description.clone();
        }
        if let Some(strategy) = &args.strategy {
            draft.strategy = parse_strategy(strategy)?;
        }
        draft.enable_cache = args.enable_cache;
    }
    if args.random_code {
        let code = console.wizard.generate_code().to_string();
        println!("{} Generated code: {}", "ℹ".bold().blue(), code.cyan());
    }

    let created = console.submit_wizard().await?;
    println!(
        "{} Created link {} ({} target{})",
        "✓".bold().green(),
        created.short_code.cyan(),
        created.targets.len(),
        if created.targets.len() == 1 { "" } else { "s" }
    );
    Ok(())
}
