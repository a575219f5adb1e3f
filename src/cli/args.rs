//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Query a vampire lineage: seniority, lookup, descendants and common ancestors
#[derive(Parser, Debug)]
#[command(name = "vampire-lineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d -d -d)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Lineage file (default: lineage_file from settings)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the lineage as a tree
    Tree,

    /// Sire hops between a vampire and the original
    Depth {
        /// Vampire name
        name: String,
    },

    /// Is FIRST strictly more senior than SECOND
    Senior {
        first: String,
        second: String,
    },

    /// Look up a vampire by name
    Find {
        /// Vampire name
        name: String,
    },

    /// Count all descendants of a vampire
    Descendants {
        /// Vampire name
        name: String,
    },

    /// Count vampires directly turned by a vampire
    Offspring {
        /// Vampire name
        name: String,
    },

    /// List vampires turned after a year, in pre-order
    ConvertedAfter {
        /// Subtree root (default: the original vampire)
        name: Option<String>,
        /// Threshold year (default: millennial_year from settings)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Is CANDIDATE an ancestor of NAME (every vampire is its own ancestor)
    Ancestor {
        candidate: String,
        name: String,
    },

    /// Closest common ancestor of two vampires
    CommonAncestor {
        first: String,
        second: String,
    },

    /// Show effective settings
    Config {
        /// Print a commented template instead
        #[arg(long)]
        template: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
