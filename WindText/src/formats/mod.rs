//! File format handlers
//!
//! Only the BMG message bank is handled here; the archive that carries it is
//! treated as an opaque store (see [`crate::archive`]).

pub mod bmg;

// Re-export main document types
pub use bmg::{
    ItemId, Message, MessageBank, MessageFilter, TextEncoding, bmg_to_bytes, build_csv,
    parse_bmg_bytes, read_bmg, write_bmg,
};
