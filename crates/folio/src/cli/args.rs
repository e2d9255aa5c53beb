//! Clap argument definitions for the `folio` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Full-text search over paginated documents")]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file to use instead of the nearest folio.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `folio index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    /// JSON file of extracted page text: [{"filename": ..., "pages": {"0": ...}}]
    pub file: PathBuf,

    /// Output the indexing report in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `folio search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query string
    pub query: String,

    /// Result page to show (1-based)
    #[arg(short = 'p', long, default_value = "1")]
    pub page: usize,

    /// Results per page [default: from config]
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Maximum candidate hits to retrieve [default: from config]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// List every matching page instead of the best page per file
    #[arg(long)]
    pub no_group: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Show the resolved query tree without searching
    #[arg(long)]
    pub explain: bool,
}

/// Arguments for `folio remove`.
#[derive(Args, Debug, Clone)]
pub struct RemoveCommand {
    /// Filename of the document to remove (exact, case-sensitive)
    pub filename: String,
}

/// Supported `folio` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Index extracted page text from a JSON file
    Index(IndexCommand),

    /// Search indexed pages
    #[command(after_help = "\
QUERY SYNTAX:
  term              Term must appear
  term1 term2       Both terms (implicit AND)
  \"phrase\"          Exact phrase match
  term1 OR term2    Either term
  (expr)            Grouping

FIELD QUERIES:
  content:term      Search in page text only
  filename:term     Search in filenames only

EXAMPLES:
  folio search fox
  folio search '\"lazy dog\"'
  folio search 'filename:report (budget OR forecast)'")]
    Search(SearchCommand),

    /// Remove every page of a document
    Remove(RemoveCommand),

    /// Discard the index and start over empty
    Rebuild,

    /// Show index location, state and size
    Status,

    /// Show effective configuration settings
    Config,
}
