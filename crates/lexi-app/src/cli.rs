use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lexi_core::SortKey;
use lexi_types::VoteDirection;

/// Crowdsourced English-Myanmar dictionary
#[derive(Parser, Debug)]
#[command(name = "lexi", version)]
pub struct Cli {
    /// JSON profile to use instead of environment variables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search headwords, glosses, definitions and tags
    Search { query: String },

    /// Print one entry by id
    Show { id: String },

    /// Table of all entries, filtered, sorted and paged
    List {
        /// Substring of a headword, gloss or tag
        filter: Option<String>,
        /// `headword`, `upvotes` or `downvotes`
        #[arg(short, long, default_value = "headword")]
        sort: SortKey,
        #[arg(long)]
        desc: bool,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Print a random entry
    Random,

    /// Next entry waiting for your vote
    Next,

    /// Vote on an entry, voting the same way twice retracts
    Vote {
        id: String,
        /// `up` or `down`
        direction: VoteDirection,
    },

    /// Merge entries from a JSON array file
    Import { file: PathBuf },

    /// Write the collection as JSON, to stdout when no file is given
    Export { file: Option<PathBuf> },

    /// Generate new entries around a topic
    Generate {
        topic: String,
        #[arg(short, long)]
        count: Option<u32>,
    },

    /// Generate the entry for a single word
    Define { word: String },

    /// Let the generator fix an existing entry
    Correct { headword: String },

    /// Let the generator add examples to an existing entry
    Enrich { headword: String },

    /// Replace an entry with the JSON object in `file`
    Edit { headword: String, file: PathBuf },

    /// Delete every entry with exactly this headword
    Delete { headword: String },

    /// Propose the JSON object in `file` as an edit for review
    Suggest { headword: String, file: PathBuf },

    /// Fetch remote entries into the local collection
    Pull,
}
