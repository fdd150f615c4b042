//! sift command line
//!
//! Parse selectors, inspect their structure and compile them into document
//! filters.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

/// sift: selector-style queries for document stores
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the canonical form of a selector
    sift parse 'article > .news'

    # Dump the parsed selector as JSON
    sift parse --json 'vehicles>car .crossover'

    # Show sequences and combinators
    sift tree 'a.x>b.y c'

    # Compile into a document filter
    sift compile '$admin[age>=18]:sort(name desc):limit(10)'

    # Resolve a path root and use custom field names
    sift compile '/#4e2a1f/*' --root '#4e2a1f=/news/2024' --config fields.json
"#)]
struct Cli {
    /// Log every dispatched event
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a selector and print it in canonical form
    Parse {
        /// Selector pattern
        pattern: String,

        /// Print the AST as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Print the sequences and combinators of a selector
    Tree {
        /// Selector pattern
        pattern: String,
    },

    /// Compile a selector into a JSON document filter
    Compile {
        /// Selector pattern
        pattern: String,

        /// JSON file with field names (`id_field`, `role_field`, ...)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Path of a root selector, e.g. `#4e2a1f=/news/2024`
        #[arg(long = "root", value_name = "SELECTOR=PATH")]
        roots: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!(
            "sift_selector={log_level},sift_query={log_level}"
        )))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Parse { pattern, json } => commands::parse(&pattern, json),
        Command::Tree { pattern } => commands::tree(&pattern),
        Command::Compile {
            pattern,
            config,
            roots,
        } => commands::compile(&pattern, config.as_deref(), &roots),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
