//! Main application entry point

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cg_cases::{aggregate, case_columns, load_cases, DashboardConfig, DashboardSession};
use cg_core::events::{FiltersChanged, PageChanged, RecordsReplaced, SortChanged};
use cg_core::{EventBus, SortState};

mod args;
mod render;

use args::{Cli, Commands, DashboardArgs};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    match &cli.config {
        Some(path) => DashboardConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(DashboardConfig::default()),
    }
}

/// Log session state changes; visible with `--verbose`
fn log_session_events(events: &EventBus) {
    events.subscribe(|e: &FiltersChanged| debug!(filters = %e.description, "filters changed"));
    events.subscribe(|e: &SortChanged| debug!(key = ?e.key, direction = ?e.direction, "sort changed"));
    events.subscribe(|e: &PageChanged| debug!(from = e.from, to = e.to, "page changed"));
    events.subscribe(|e: &RecordsReplaced| debug!(count = e.count, "records replaced"));
}

fn run_dashboard(config: &DashboardConfig, args: DashboardArgs) -> Result<()> {
    let cases = load_cases(&args.file)
        .with_context(|| format!("Failed to load cases from {}", args.file.display()))?;
    info!("Loaded {} cases from {}", cases.len(), args.file.display());

    let mut session = DashboardSession::new(cases, config)?;
    log_session_events(session.events());
    session.set_primary_type(args.primary_type);
    session.set_status(args.status);
    session.set_priority(args.priority);
    session.set_search(args.search);

    let assignee = if args.mine {
        Some(config.current_user.context("--mine needs current_user in the config")?)
    } else {
        args.assignee
    };
    session.set_assigned_to(assignee);

    if let Some(key) = args.sort {
        session.set_sort(SortState::new(key, args.order.into()))?;
    }
    if let Some(page_size) = args.page_size {
        session.set_page_size(page_size)?;
    }
    session.set_page(args.page);

    if args.select_page {
        session.toggle_page_selected()?;
    }
    for key in &args.selected {
        if !session.selection().is_selected(key) {
            session.toggle_selected(key);
        }
    }
    for key in &args.expanded {
        session.toggle_expanded(key);
    }

    let now = args.now.unwrap_or_else(Utc::now);
    let view = session.view(now)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&*view)?);
    } else {
        print!("{}", render::dashboard(&case_columns()?, &view)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Dashboard(args) => run_dashboard(&config, args)?,
        Commands::Stats { file, now, json } => {
            let cases = load_cases(&file)
                .with_context(|| format!("Failed to load cases from {}", file.display()))?;
            let stats = aggregate(&cases, now.unwrap_or_else(Utc::now), config.recent_window()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                let mut out = String::new();
                render::stats(&mut out, &stats)?;
                print!("{out}");
            }
        }
        Commands::Config => println!("{}", config.to_json_pretty()?),
    }

    Ok(())
}
