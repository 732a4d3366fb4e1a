use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "itch-jam-scan")]
#[command(version, about = "Track and classify itch.io game jams in a local database")]
pub struct Cli {
    /// Database file (default: platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// TOML file with a `tabletop` keyword array for auto-classification
    #[arg(long, global = true)]
    pub keywords: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl upcoming and in-progress jams, or specific jam ids
    Crawl {
        /// Jam ids to crawl instead of walking the listings
        id: Vec<String>,

        /// Re-fetch jams that are already stored
        #[arg(short, long)]
        force: bool,
    },

    /// List jams (bare `list` shows upcoming tabletop jams)
    List {
        /// Filter by game type (tabletop, digital, unclassified)
        #[arg(long = "type", value_name = "TYPE")]
        gametype: Option<String>,

        /// Filter by owner id or owner name substring
        #[arg(long)]
        owner: Option<String>,

        /// Filter by jam name substring
        #[arg(long)]
        name: Option<String>,

        /// Filter by exact jam id
        #[arg(long)]
        id: Option<String>,

        /// Include jams that already ended
        #[arg(long)]
        old: bool,
    },

    /// Show detailed information for jams
    Show {
        /// One or more jam ids
        #[arg(required = true)]
        id: Vec<String>,
    },

    /// Classify jams as tabletop, digital, or unclassified
    Classify {
        /// Jam ids to classify (default: every unclassified jam)
        id: Vec<String>,

        /// Type to assign; prompts per jam when omitted
        #[arg(long = "type", value_name = "TYPE")]
        gametype: Option<String>,
    },

    /// Delete jams from the database
    Delete {
        /// One or more jam ids; unknown ids are ignored
        #[arg(required = true)]
        id: Vec<String>,
    },

    /// Migrate a legacy blob-table database to the normalized schema
    Migrate,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
