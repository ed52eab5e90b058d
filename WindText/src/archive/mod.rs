//! Archive stores
//!
//! The message bank ships inside a game archive. Reading and writing the
//! archive container itself is someone else's job; this crate only needs a
//! store that maps logical paths to bytes.
//!
//! - [`MemoryArchive`]: in-memory map, for tests and embedding
//! - [`DirectoryArchive`]: an archive already extracted to disk

mod directory;
mod memory;
mod session;

pub use directory::DirectoryArchive;
pub use memory::MemoryArchive;
pub use session::BankSession;

use crate::error::{Error, Result};

/// Logical path of the main text bank inside `bmgres.arc`
pub const DEFAULT_BANK_PATH: &str = "zel_00.bmg";

/// A key-to-bytes store holding archive files
pub trait ArchiveStore {
    /// Read the file at `path`, or `None` if it does not exist.
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Replace (or create) the file at `path`.
    fn set(&mut self, path: &str, data: Vec<u8>) -> Result<()>;

    /// All file paths in the store.
    fn paths(&self) -> Result<Vec<String>>;

    /// Check whether a file exists at `path`.
    fn contains(&self, path: &str) -> Result<bool> {
        Ok(self.get(path)?.is_some())
    }
}

/// Normalize a logical path: forward slashes, no leading slash, no `.` parts
///
/// # Errors
/// Returns [`Error::InvalidPath`] for empty paths and paths containing `..`.
pub fn normalize_path(path: &str) -> Result<String> {
    let mut parts = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => return Err(Error::InvalidPath(path.to_string())),
            _ => parts.push(part),
        }
    }

    if parts.is_empty() {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(parts.join("/"))
}
