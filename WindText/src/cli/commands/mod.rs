use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

pub mod bank;

#[derive(Subcommand)]
pub enum Commands {
    /// Show encoding, message count and reference problems
    Info {
        /// .bmg file or extracted archive directory
        source: PathBuf,
    },

    /// List messages
    List {
        /// .bmg file or extracted archive directory
        source: PathBuf,

        /// Search query (`msgid:N`, `index:N`, or text)
        #[arg(short, long, default_value = "")]
        filter: String,

        /// Maximum number of messages to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },

    /// Print one message with its metadata
    Get {
        /// .bmg file or extracted archive directory
        source: PathBuf,

        /// Message id
        id: u16,
    },

    /// Replace the text of a message
    Set {
        /// .bmg file or extracted archive directory
        source: PathBuf,

        /// Message id
        id: u16,

        /// New text (escape tags like `{00:0000}` allowed)
        text: String,
    },

    /// Add a new message (reusing a free slot if there is one)
    Add {
        /// .bmg file or extracted archive directory
        source: PathBuf,

        /// Text for the new message
        #[arg(short, long)]
        text: Option<String>,
    },

    /// Find and replace text in every message
    Replace {
        /// .bmg file or extracted archive directory
        source: PathBuf,

        /// Text to find
        find: String,

        /// Replacement text
        replace: String,

        /// Match case exactly
        #[arg(long)]
        case_sensitive: bool,

        /// Report what would change without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Export messages as CSV
    Export {
        /// .bmg file or extracted archive directory
        source: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Dump the whole bank as JSON
    Dump {
        /// .bmg file or extracted archive directory
        source: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check that re-encoding the bank is stable
    Verify {
        /// .bmg file or extracted archive directory
        source: PathBuf,
    },
}

impl Commands {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        match self {
            Commands::Info { source } => bank::info(source, config),
            Commands::List {
                source,
                filter,
                limit,
            } => bank::list(source, config, filter, *limit),
            Commands::Get { source, id } => bank::get(source, config, *id),
            Commands::Set { source, id, text } => bank::set(source, config, *id, text),
            Commands::Add { source, text } => bank::add(source, config, text.as_deref()),
            Commands::Replace {
                source,
                find,
                replace,
                case_sensitive,
                dry_run,
            } => bank::replace(source, config, find, replace, *case_sensitive, *dry_run),
            Commands::Export { source, output } => bank::export(source, config, output.as_deref()),
            Commands::Dump { source, output } => bank::dump(source, config, output.as_deref()),
            Commands::Verify { source } => bank::verify(source, config),
        }
    }
}
