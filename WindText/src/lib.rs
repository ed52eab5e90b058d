//! # WindText
//!
//! A pure-Rust library for the message bank (BMG) of The Legend of Zelda:
//! The Wind Waker.
//!
//! ## Supported Formats
//!
//! - **BMG** - `MESGbmg1` message banks with `INF1`/`DAT1` sections
//! - **Text** - Windows-1252 (with the game's extra letters), Shift-JIS,
//!   UTF-16BE and UTF-8 string tables, with control codes rendered as tags
//! - **CSV** - Plain `ID,Text` export for translators
//!
//! ## Quick Start
//!
//! ```no_run
//! use windtext::prelude::*;
//!
//! let mut bank = read_bmg("zel_00.bmg")?;
//! println!("{} messages ({})", bank.len(), bank.encoding());
//!
//! bank.set_text(1, "Hello, sailor!");
//! write_bmg("zel_00.bmg", &bank)?;
//! # Ok::<(), windtext::Error>(())
//! ```
//!
//! ### Working through an archive store
//!
//! ```no_run
//! use windtext::prelude::*;
//!
//! let store = DirectoryArchive::open("bmgres")?;
//! let mut session = BankSession::open(store, "zel_00.bmg", EncodeOptions::default())?;
//! for message in session.bank().filter("Tingle") {
//!     println!("{}: {}", message.id, message.text);
//! }
//! session.bank_mut().replace_all("Tingle", "Tingle!", true);
//! session.save()?;
//! # Ok::<(), windtext::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `windtext` command-line binary

pub mod archive;
pub mod config;
pub mod error;
pub mod formats;

pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::config::Config;

    pub use crate::formats::bmg::{
        EncodeOptions, EscapeSequence, ItemId, Message, MessageBank, MessageFilter,
        ReplaceResult, TextEncoding,
        bmg_to_bytes, bmg_to_bytes_with_options, build_csv, export_csv, parse_bmg_bytes,
        read_bmg, write_bmg,
    };

    pub use crate::archive::{
        ArchiveStore, BankSession, DirectoryArchive, MemoryArchive, DEFAULT_BANK_PATH,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
