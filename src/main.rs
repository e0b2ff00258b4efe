// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and load configuration
// 3. Dispatch to the handler for the chosen subcommand
// 4. Exit with proper code (0 = success, 1 = the operation failed, 2 = error)
// =============================================================================

mod cli;          // src/cli.rs - command-line parsing
mod config;       // src/config.rs - environment-driven settings
mod error;        // src/error.rs - the ScribeError taxonomy
mod github;       // src/github/ - URL parsing, API client, tree rebuild
mod logging;      // src/logging.rs - tracing subscriber setup
mod orchestrator; // src/orchestrator.rs - the generate pipeline
mod render;       // src/render/ - Markdown generation
mod service;      // src/service.rs - get/list/delete with validation
mod store;        // src/store/ - SQLite persistence

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use config::AppConfig;
use error::ScribeError;
use github::GithubClient;
use store::{DocumentPage, SqliteDocumentStore};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_level) {
        eprintln!("Error: {:#}", e);
        std::process::exit(2);
    }

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    };

    std::process::exit(exit_code);
}

// Domain failures (bad URL, missing repo, unknown id) exit with 1;
// anything else means something broke on our side
fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ScribeError>() {
        Some(e) if e.is_user_facing() => 1,
        _ => 2,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(db) = cli.db {
        config.database_path = db;
    }
    config.trace_loaded();

    let store = SqliteDocumentStore::open(&config.database_path)
        .with_context(|| format!("could not open database {}", config.database_path.display()))?;

    match cli.command {
        Commands::Generate { repo_url, json, output } => {
            handle_generate(&config, &store, &repo_url, json, output.as_deref()).await
        }
        Commands::Get { id, json } => handle_get(&store, id, json),
        Commands::List { limit, offset, json } => handle_list(&store, limit, offset, json),
        Commands::Delete { id } => {
            service::delete_document(&store, id)?;
            println!("🗑️  Deleted document {}", id);
            Ok(())
        }
    }
}

async fn handle_generate(
    config: &AppConfig,
    store: &SqliteDocumentStore,
    repo_url: &str,
    json: bool,
    output: Option<&Path>,
) -> Result<()> {
    let client = GithubClient::new(&config.github)?;
    let result = orchestrator::generate_document(&client, store, repo_url, config.request_timeout).await?;

    if let Some(path) = output {
        std::fs::write(path, &result.markdown)
            .with_context(|| format!("could not write {}", path.display()))?;
        eprintln!("📄 Wrote {} (document id {})", path.display(), result.id);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if output.is_none() {
        print!("{}", result.markdown);
        eprintln!("✅ Stored as document {}", result.id);
    }
    Ok(())
}

fn handle_get(store: &SqliteDocumentStore, id: i64, json: bool) -> Result<()> {
    let doc = service::get_document(store, id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", doc.markdown);
    }
    Ok(())
}

fn handle_list(store: &SqliteDocumentStore, limit: u32, offset: u32, json: bool) -> Result<()> {
    let page = service::list_documents(store, limit, offset)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_table(&page, offset);
    }
    Ok(())
}

// Prints a page of documents as a human-readable table
fn print_table(page: &DocumentPage, offset: u32) {
    if page.items.is_empty() {
        println!("No documents (total: {})", page.total);
        return;
    }

    println!("{:<6} {:<30} {:<50} {:<20}", "ID", "NAME", "URL", "CREATED");
    println!("{}", "=".repeat(106));

    for doc in &page.items {
        println!(
            "{:<6} {:<30} {:<50} {:<20}",
            doc.id,
            truncate(&doc.repo_name, 30),
            truncate(&doc.repo_url, 50),
            doc.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    println!();
    let first = offset as u64 + 1;
    let last = offset as u64 + page.items.len() as u64;
    println!("📋 Showing {}-{} of {}", first, last, page.total);
}

// Shortens a value for display, respecting character boundaries
fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
