//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

pub const DEFAULT_TOPIC: &str = "Design the most engaging Web3 incentive scheme for IdeaTree";

/// Round-based decision tree: branches compete, winners branch again
#[derive(Parser, Debug)]
#[command(name = "ideatree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Policy file (toml, yaml or json), layered over the defaults
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Seed the random source for a reproducible run
    #[arg(long, global = true, env = "IDEATREE_SEED")]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a decision on the round timer
    Run {
        /// Main topic of the decision
        #[arg(short, long, default_value = DEFAULT_TOPIC)]
        topic: String,

        /// One-second rounds, no reveal pause
        #[arg(long)]
        fast: bool,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve every round immediately
    Step {
        /// Main topic of the decision
        #[arg(short, long, default_value = DEFAULT_TOPIC)]
        topic: String,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// List sample decisions
    Catalog {
        #[arg(value_enum, default_value_t = CatalogFilter::All)]
        filter: CatalogFilter,

        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFilter {
    Ongoing,
    Completed,
    Upcoming,
    All,
}
