// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Four subcommands, one per operation:
//   generate <url>   fetch a repository and store a Markdown document for it
//   get <id>         print a stored document
//   list             page through stored documents, newest first
//   delete <id>      remove a stored document
//
// Rust concepts:
// - Derive macros: clap generates the parser from these structs and enums
// - value_parser ranges: clap rejects out-of-range numbers before we run
// =============================================================================

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::LogLevel;
use crate::service::DEFAULT_PAGE_LIMIT;

#[derive(Parser, Debug)]
#[command(
    name = "repo-scribe",
    version,
    about = "Generate Markdown overviews of GitHub repositories",
    long_about = "repo-scribe fetches a public GitHub repository's metadata and file tree, \
                  renders them as a Markdown document, and keeps the result in a local \
                  SQLite database so it can be listed, re-read, or deleted later."
)]
pub struct Cli {
    /// SQLite database file (overrides REPO_SCRIBE_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log verbosity; RUST_LOG takes precedence when set
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate and store a Markdown document for a repository
    ///
    /// Example: repo-scribe generate https://github.com/rust-lang/cargo
    Generate {
        /// GitHub repository URL (e.g., https://github.com/user/repo)
        repo_url: String,

        /// Print the full result as JSON instead of the Markdown
        #[arg(long)]
        json: bool,

        /// Write the Markdown to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print a stored document
    Get {
        /// Document id, as shown by `list`
        id: i64,

        /// Print the whole record (including the file tree) as JSON
        #[arg(long)]
        json: bool,
    },

    /// List stored documents, newest first
    List {
        /// Page size (1-100)
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: u32,

        /// Number of documents to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// Output the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete a stored document
    Delete {
        /// Document id, as shown by `list`
        id: i64,
    },
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does `global = true` do?
//    - The flag is accepted before or after the subcommand name
//    - `repo-scribe --db x.db list` and `repo-scribe list --db x.db` both work
//
// 2. Why value_parser!(u32).range(1..=100)?
//    - clap checks the range while parsing and prints a helpful error
//    - The service layer checks it again for callers that skip the CLI
//
// 3. Why i64 for ids?
//    - SQLite row ids are 64-bit signed integers
// -----------------------------------------------------------------------------
