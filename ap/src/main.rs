//! ap - artifact section progress from the command line

use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, warn};

use artifactprogress::cli::{Cli, Command};
use artifactprogress::config::Config;
use artifactprogress::{
    Artifact, JsonFileStore, ProgressTracker, UpdateOutcome, check_progress_counts, check_section_metadata,
    get_next_incomplete_section, get_progress_display, get_progress_percentage, samples,
};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (WARN)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

fn print_outcome(outcome: UpdateOutcome, what: &str) {
    match outcome {
        UpdateOutcome::Written => println!("{} {}", "✓".green(), what),
        UpdateOutcome::Unchanged => println!("{} {} (already set)", "·".dimmed(), what),
    }
}

fn print_artifact(artifact: &Artifact) {
    println!(
        "{} {} [{}, {}]",
        artifact.name.bold(),
        artifact.id.dimmed(),
        artifact.stage.to_string().cyan(),
        artifact.status
    );
    for section in &artifact.section_metadata {
        let mark = if section.is_done { "[x]".green() } else { "[ ]".normal() };
        let fold = if section.is_collapsed { "▸" } else { "▾" };
        println!("  {} {} {} {}", mark, fold, section.title, section.slug.dimmed());
    }
    println!(
        "Progress: {} ({}%)",
        get_progress_display(artifact).yellow(),
        get_progress_percentage(artifact)
    );
    match get_next_incomplete_section(artifact) {
        Some(next) => println!("Next: {}", next.title.cyan()),
        None => println!("{}", "All sections done".green()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    let store_path = cli.store.clone().unwrap_or_else(|| config.storage.path.clone());
    debug!(store_path = %store_path.display(), "main: opening store");
    let store = Arc::new(JsonFileStore::open(&store_path).await?);
    let tracker = ProgressTracker::with_config(store.clone(), config.tracker.clone());
    let table = config.tracker.table.as_str();

    match cli.command {
        Command::Seed { id, project } => {
            let mut artifact = samples::example_artifact();
            artifact.id = id.unwrap_or_else(|| uuid::Uuid::now_v7().to_string());
            if let Some(project) = project {
                artifact.project_id = project;
            }
            let serde_json::Value::Object(record) = serde_json::to_value(&artifact)? else {
                return Err(eyre::eyre!("Artifact did not serialize to an object"));
            };
            store.insert(table, record).await?;
            println!("{} Seeded artifact: {}", "✓".green(), artifact.id.cyan());
        }
        Command::List => {
            let records = store.list(table).await?;
            if records.is_empty() {
                println!("No artifacts found");
            }
            for record in records {
                match serde_json::from_value::<Artifact>(serde_json::Value::Object(record)) {
                    Ok(artifact) => println!(
                        "{} {} {} {} ({}%)",
                        artifact.id.dimmed(),
                        artifact.name,
                        artifact.stage.to_string().cyan(),
                        get_progress_display(&artifact).yellow(),
                        get_progress_percentage(&artifact)
                    ),
                    Err(e) => warn!(error = %e, "Skipping malformed artifact record"),
                }
            }
        }
        Command::Show { id } => {
            let artifact = tracker.load_artifact(&id).await?;
            print_artifact(&artifact);
        }
        Command::Done { id, slug } => {
            let outcome = tracker.update_section_done_state(&id, &slug, true).await?;
            print_outcome(outcome, &format!("Marked '{}' done", slug));
        }
        Command::Undone { id, slug } => {
            let outcome = tracker.update_section_done_state(&id, &slug, false).await?;
            print_outcome(outcome, &format!("Marked '{}' not done", slug));
        }
        Command::Collapse { id, slug } => {
            let outcome = tracker.update_section_collapse_state(&id, &slug, true).await?;
            print_outcome(outcome, &format!("Collapsed '{}'", slug));
        }
        Command::Expand { id, slug } => {
            let outcome = tracker.update_section_collapse_state(&id, &slug, false).await?;
            print_outcome(outcome, &format!("Expanded '{}'", slug));
        }
        Command::Validate { id } => {
            let artifact = tracker.load_artifact(&id).await?;
            let mut issues = check_section_metadata(&artifact.section_metadata);
            issues.extend(check_progress_counts(&artifact));
            if issues.is_empty() {
                println!("{} {} is valid", "✓".green(), artifact.name);
            } else {
                for issue in &issues {
                    println!("{} {}", "✗".red(), issue);
                }
                return Err(eyre::eyre!("{} has {} issue(s)", artifact.name, issues.len()));
            }
        }
    }

    Ok(())
}
