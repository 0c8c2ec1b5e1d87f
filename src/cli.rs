use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// MTGJSON ingestion helpers.
#[derive(Parser, Debug)]
#[command(name = "mtgetl", version, about)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON). Defaults to the user config directory.
    #[arg(short, long, global = true, env = "MTGETL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record the publication date and version of every configured dataset
    Recency(RecencyArgs),
    /// Print the nested structure of a dataset
    Structure(StructureArgs),
    /// Count null, missing and blank values per column of an array of objects
    Empties(EmptiesArgs),
    /// List Card Kingdom and TCGplayer links of every sealed product in a set list
    PurchaseUrls(PurchaseUrlsArgs),
}

#[derive(Args, Debug, Default)]
pub struct RecencyArgs {
    /// Validate and report without writing to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Print the recency table afterwards
    #[arg(long)]
    pub show: bool,
}

#[derive(Args, Debug)]
pub struct StructureArgs {
    /// Dataset file, optionally compressed
    pub file: PathBuf,

    /// Only describe the value at this JSON pointer (e.g. `/data/LEA`)
    #[arg(short, long)]
    pub pointer: Option<String>,

    /// Number of levels to print
    #[arg(short = 'd', long)]
    pub max_depth: Option<usize>,

    /// Print a KEY_NAME/DATA_TYPE/LENGTH table of the top-level keys instead
    #[arg(short, long, conflicts_with = "max_depth")]
    pub summary: bool,
}

#[derive(Args, Debug)]
pub struct EmptiesArgs {
    /// Dataset file, optionally compressed
    pub file: PathBuf,

    /// JSON pointer to an array of objects (e.g. `/data/LEA/cards`)
    #[arg(short, long)]
    pub pointer: String,
}

#[derive(Args, Debug)]
pub struct PurchaseUrlsArgs {
    /// Set list file, optionally compressed
    pub file: PathBuf,
}
