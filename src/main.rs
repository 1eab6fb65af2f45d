//! gh-relabel CLI
//!
//! Command line tool that replaces a GitHub repository's labels with a
//! curated catalog

use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use std::path::PathBuf;

use gh_relabel::{
    config::load_labels_from_file,
    github::Listing,
    sync::{LabelSynchronizer, SyncOutcome, SyncReport},
    Error, Label, Result, SyncConfig,
};

/// gh-relabel CLI
#[derive(Parser)]
#[command(
    name = "gh-relabel",
    version,
    about = "Replace a GitHub repository's labels with a curated catalog",
    long_about = "Replaces the label set of a GitHub repository: deletes every existing label, \
    then creates a curated catalog. Also offers a non-destructive reconcile mode and dry-run."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// GitHub access token (falls back to GITHUB_TOKEN, then a prompt)
    #[arg(short = 't', long, global = true)]
    access_token: Option<String>,

    /// Target repository (owner/repo format; prompted if missing)
    #[arg(short = 'r', long, global = true)]
    repository: Option<String>,

    /// Label catalog file (JSON/YAML); the built-in catalog is used otherwise
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Dry run mode (don't make actual changes)
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Purge all labels, then seed the catalog (the default)
    Run,

    /// Delete every label in the repository
    Purge,

    /// Create every catalog entry
    Seed,

    /// Reconcile the repository with the catalog (no full purge)
    Sync,

    /// Display current labels
    List {
        /// Output format
        #[arg(long, default_value = "table", value_parser = ["table", "json", "yaml"])]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let token = resolve_access_token(cli.access_token)?;
    let repository = resolve_repository(cli.repository)?;
    let labels = load_catalog(cli.config)?;

    let config = SyncConfig {
        access_token: token,
        repository,
        dry_run: cli.dry_run,
        labels,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let report = LabelSynchronizer::new(config)?.run().await?;
            finish(&report)
        }
        Commands::Purge => {
            let report = LabelSynchronizer::new(config)?.purge().await?;
            finish(&report)
        }
        Commands::Seed => {
            let report = LabelSynchronizer::new(config)?.seed().await?;
            finish(&report)
        }
        Commands::Sync => {
            let report = LabelSynchronizer::new(config)?.reconcile().await?;
            finish(&report)
        }
        Commands::List { format } => run_list(config, &format).await,
    }
}

/// Execute the list command
async fn run_list(config: SyncConfig, format: &str) -> Result<()> {
    let synchronizer = LabelSynchronizer::new(config)?;

    let labels = match synchronizer.current_labels().await? {
        Listing::Labels(labels) => labels,
        Listing::Failed { status, body } => {
            eprintln!("{} Failed to list labels (HTTP {}): {}", "✗".red(), status, body);
            std::process::exit(1);
        }
    };

    match format {
        "table" => {
            println!(
                "{:<30} {:<8} {:<50}",
                "Name".cyan(),
                "Color".cyan(),
                "Description".cyan()
            );
            println!("{}", "─".repeat(90));

            for label in labels {
                let description = label.description.as_deref().unwrap_or("(none)");
                println!(
                    "{:<30} {:<8} {:<50}",
                    label.name,
                    format!("#{}", label.color),
                    description
                );
            }
        }
        "json" => println!("{}", serde_json::to_string_pretty(&labels)?),
        "yaml" => println!("{}", serde_yaml::to_string(&labels)?),
        _ => return Err(Error::config_validation("Unsupported format")),
    }

    Ok(())
}

/// Print the report and exit non-zero if anything failed
fn finish(report: &SyncReport) -> Result<()> {
    display_report(report);

    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}

/// Display a synchronization report
fn display_report(report: &SyncReport) {
    for outcome in &report.outcomes {
        match outcome {
            SyncOutcome::Deleted { name } => {
                println!("{} Deleted label: {}", "✓".green(), name.cyan());
            }
            SyncOutcome::DeleteFailed { name, detail } => {
                println!("{} Failed to delete label: {} - {}", "✗".red(), name.cyan(), detail);
            }
            SyncOutcome::ListingFailed { detail } => {
                println!("{} Failed to list existing labels: {}", "✗".red(), detail);
            }
            SyncOutcome::Created { name } => {
                println!("{} Created label: {}", "✓".green(), name.cyan());
            }
            SyncOutcome::CreateFailed { name, detail } => {
                println!("{} Failed to create label: {} - {}", "✗".red(), name.cyan(), detail);
            }
            SyncOutcome::Updated { name, changes } => {
                println!("{} Updated label: {}", "✓".yellow(), name.cyan());
                for change in changes {
                    println!("    {}", change.dimmed());
                }
            }
            SyncOutcome::UpdateFailed { name, detail } => {
                println!("{} Failed to update label: {} - {}", "✗".red(), name.cyan(), detail);
            }
            SyncOutcome::Unchanged { name } => {
                println!("{} No change: {}", "·".white(), name.white());
            }
        }
    }

    if report.dry_run {
        println!("\n{} Dry run - no changes were made", "!".yellow());
    }

    println!(
        "\n  Deleted: {}  Created: {}  Updated: {}  Unchanged: {}  Failed: {}",
        report.deleted.to_string().red(),
        report.created.to_string().green(),
        report.updated.to_string().yellow(),
        report.unchanged.to_string().white(),
        report.failed.to_string().red()
    );
}

/// Get the access token from the flag or GITHUB_TOKEN
fn get_access_token(arg_token: Option<String>) -> Result<String> {
    arg_token
        .or_else(|| std::env::var("GITHUB_TOKEN").ok())
        .ok_or_else(|| {
            Error::config_validation(
                "GitHub access token is required. Set via --access-token or GITHUB_TOKEN",
            )
        })
}

/// Resolve the access token, prompting without echo as a last resort
fn resolve_access_token(arg_token: Option<String>) -> Result<String> {
    match get_access_token(arg_token) {
        Ok(token) => Ok(token),
        Err(_) => Password::new()
            .with_prompt("Enter your GitHub token")
            .interact()
            .map_err(|e| Error::config_validation(format!("Token prompt failed: {}", e))),
    }
}

/// Resolve the target repository, prompting as a last resort
fn resolve_repository(arg_repo: Option<String>) -> Result<String> {
    match arg_repo {
        Some(repo) => Ok(repo),
        None => Input::<String>::new()
            .with_prompt("Enter the repository (owner/repo)")
            .interact_text()
            .map_err(|e| Error::config_validation(format!("Repository prompt failed: {}", e))),
    }
}

/// Load the catalog override, if one was given
fn load_catalog(config_path: Option<PathBuf>) -> Result<Option<Vec<Label>>> {
    match config_path {
        Some(path) => Ok(Some(load_labels_from_file(path)?)),
        None => Ok(None),
    }
}
