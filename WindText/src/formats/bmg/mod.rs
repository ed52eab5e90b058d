//! `.bmg` message bank format
//!
//! Big-endian binary container for the game's text table. A 32-byte file
//! header is followed by two sections:
//!
//! - `INF1`: fixed-stride records with per-message metadata and an offset
//!   into the text data
//! - `DAT1`: a pool of null-terminated strings in the bank's encoding
//!
//! ```text
//! 0x00  "MESGbmg1"   u32 total size   u32 section count   u8 encoding   [15 reserved]
//! 0x20  "INF1"       u32 size   u16 count   u16 stride   [4 reserved]   records...   [16 pad]
//!       "DAT1"       u32 size   strings...
//! ```

mod editor;
mod export;
mod item;
mod message;
mod reader;
pub mod text;
mod writer;

use serde::Serialize;

pub use editor::{MessageFilter, ReplaceResult};
pub use export::{build_csv, build_csv_with_header, export_csv};
pub use item::ItemId;
pub use message::{Message, RECORD_SIZE};
pub use reader::{parse_bmg_bytes, read_bmg};
pub use text::TextEncoding;
pub use text::escape::EscapeSequence;
pub use writer::{EncodeOptions, bmg_to_bytes, bmg_to_bytes_with_options, write_bmg};

/// File magic
pub const BMG_MAGIC: &[u8; 8] = b"MESGbmg1";

/// Index section magic
pub const INF1_MAGIC: &[u8; 4] = b"INF1";

/// Text data section magic
pub const DAT1_MAGIC: &[u8; 4] = b"DAT1";

/// Size of the file header, encoding byte and reserved area included
pub const HEADER_SIZE: usize = 0x20;

/// Size of the INF1 section header
pub const INF1_HEADER_SIZE: usize = 0x10;

/// Zero padding written after the INF1 records
pub const INF1_PADDING: usize = 0x10;

/// Size of the DAT1 section header
pub const DAT1_HEADER_SIZE: usize = 0x08;

/// Number of sections this crate writes
pub const SECTION_COUNT: u32 = 2;

/// A decoded message bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageBank {
    encoding: TextEncoding,
    messages: Vec<Message>,
    #[serde(skip)]
    dirty: bool,
}

impl MessageBank {
    /// Create an empty bank.
    #[must_use]
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            messages: Vec::new(),
            dirty: false,
        }
    }

    /// Create a clean bank from already-decoded messages.
    ///
    /// Message indices are renumbered to match list order.
    #[must_use]
    pub fn from_messages(encoding: TextEncoding, mut messages: Vec<Message>) -> Self {
        for (i, message) in messages.iter_mut().enumerate() {
            message.index = i as i32;
        }
        Self {
            encoding,
            messages,
            dirty: false,
        }
    }

    /// Encoding used for every message in the bank.
    #[must_use]
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Messages in load order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Mutable access to the message list. Marks the bank dirty.
    pub fn messages_mut(&mut self) -> &mut Vec<Message> {
        self.dirty = true;
        &mut self.messages
    }

    /// Whether the bank has changes that have not been saved.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the unsaved-changes flag.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Consume the bank, returning its messages.
    #[must_use]
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
