//! CLI administration tool for TinyLink.
//!
//! Manages links directly on the configured store, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List all links
//! cargo run --bin admin -- links list
//!
//! # Create a link with a generated or chosen code
//! cargo run --bin admin -- links create https://example.com/a
//! cargo run --bin admin -- links create https://example.com/a --code MyCode1
//!
//! # Show one link
//! cargo run --bin admin -- links show MyCode1
//!
//! # Delete a link (asks for confirmation)
//! cargo run --bin admin -- links delete MyCode1
//!
//! # Totals
//! cargo run --bin admin -- stats
//!
//! # Check the store is reachable
//! cargo run --bin admin -- store check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `STORAGE`, `DATA_FILE`, `DATABASE_URL`, `BASE_URL`.
//!
//! Do not point the admin tool at the data file of a running server: each process keeps
//! its own copy of the document in memory.

use tinylink::application::services::LinkService;
use tinylink::config::Config;
use tinylink::domain::entities::Link;
use tinylink::domain::repositories::LinkStore;
use tinylink::error::AppError;
use tinylink::server::open_store;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

type Service = LinkService<dyn LinkStore>;

/// CLI tool for managing TinyLink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show totals
    Stats,

    /// Storage operations
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List all links
    List,

    /// Create a new link
    Create {
        /// Target URL (http or https)
        target: String,

        /// Custom code, 6-8 letters or digits (generated if omitted)
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Show a single link
    Show {
        /// Short code (case-insensitive)
        code: String,
    },

    /// Delete a link
    Delete {
        /// Short code (case-insensitive)
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Storage subcommands.
#[derive(Subcommand)]
enum StoreAction {
    /// Check that the configured store is reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    config.validate()?;

    let store = open_store(&config)
        .await
        .context("Failed to open link store")?;
    let service = LinkService::new(store);

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &service, &config).await?,
        Commands::Stats => handle_stats(&service).await?,
        Commands::Store { action } => handle_store_action(action, &service, &config).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, service: &Service, config: &Config) -> Result<()> {
    match action {
        LinkAction::List => list_links(service, config).await,
        LinkAction::Create { target, code } => create_link(service, config, target, code).await,
        LinkAction::Show { code } => show_link(service, config, &code).await,
        LinkAction::Delete { code, yes } => delete_link(service, &code, yes).await,
    }
}

/// Lists all links in creation order.
///
/// # Output Format
///
/// ```text
/// 🔗 Links
///
///   Code      Clicks  Last clicked       Target
///   ──────────────────────────────────────────────────────────────
///   Ab12cd3   3       2024-01-15 10:30   https://example.com/a
/// ```
async fn list_links(service: &Service, config: &Config) -> Result<()> {
    println!("{}", "🔗 Links".bright_blue().bold());
    println!();

    let links = service.list_links().await.map_err(describe)?;

    if links.is_empty() {
        println!("{}", "  No links yet".yellow());
        println!();
        println!(
            "  Create one with: {} admin -- links create <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<9} {:<7} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Last clicked".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<9} {:<7} {:<18} {}",
            link.code.cyan(),
            link.clicks.to_string().bright_green(),
            format_last_click(link).bright_black(),
            truncate(&link.target, 60)
        );
    }

    println!();
    println!(
        "  Total: {}    Short URLs: {}/<code>",
        links.len().to_string().bright_white().bold(),
        config.base_url.trim_end_matches('/')
    );
    println!();

    Ok(())
}

/// Creates a link and prints its short URL.
async fn create_link(
    service: &Service,
    config: &Config,
    target: String,
    code: Option<String>,
) -> Result<()> {
    println!("{}", "✨ Create Link".bright_blue().bold());
    println!();

    let link = service.create_link(target, code).await.map_err(describe)?;

    println!("{}", "✅ Link created".green().bold());
    println!();
    print_link(&link, config);

    Ok(())
}

/// Prints the details of one link.
async fn show_link(service: &Service, config: &Config, code: &str) -> Result<()> {
    let link = service.get_link(code).await.map_err(describe)?;

    println!("{}", "📊 Link".bright_blue().bold());
    println!();
    print_link(&link, config);

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &Service, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = service.get_link(code).await.map_err(describe)?;

    println!("  Code:   {}", link.code.cyan());
    println!("  Target: {}", link.target);
    println!("  Clicks: {}", link.clicks.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete link {}? This cannot be undone.", link.code))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service.delete_link(&link.code).await.map_err(describe)?;

    println!();
    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

/// Displays link and click totals.
async fn handle_stats(service: &Service) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let summary = service.summary().await.map_err(describe)?;

    println!(
        "  Links:  {}",
        summary.links.to_string().bright_green().bold()
    );
    println!(
        "  Clicks: {}",
        summary.clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles storage diagnostic commands.
async fn handle_store_action(action: StoreAction, service: &Service, config: &Config) -> Result<()> {
    match action {
        StoreAction::Check => {
            println!(
                "{} {}",
                "🔍 Checking link store:".bright_blue(),
                config.storage.to_string().bright_white()
            );

            if !service.store_healthy().await {
                anyhow::bail!("Link store is not reachable");
            }

            println!("{}", "✅ Link store OK".green().bold());
        }
    }

    Ok(())
}

fn print_link(link: &Link, config: &Config) {
    println!("  Code:         {}", link.code.cyan());
    println!(
        "  Short URL:    {}/{}",
        config.base_url.trim_end_matches('/'),
        link.code
    );
    println!("  Target:       {}", link.target);
    println!(
        "  Created:      {}",
        link.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!("  Clicks:       {}", link.clicks.to_string().bright_green());
    println!("  Last clicked: {}", format_last_click(link));
    println!();
}

fn format_last_click(link: &Link) -> String {
    link.last_clicked_at
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max - 1).collect();
        format!("{kept}…")
    } else {
        s.to_string()
    }
}

/// Turns a service error into a CLI-friendly message.
fn describe(e: AppError) -> anyhow::Error {
    match e {
        AppError::Storage { message, details } => {
            anyhow::anyhow!("Storage error: {} ({})", message, details)
        }
        other => anyhow::anyhow!("{}", other),
    }
}
