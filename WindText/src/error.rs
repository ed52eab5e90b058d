//! Error types for `WindText`

use thiserror::Error;

/// The error type for `WindText` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The requested path does not exist in the archive store.
    #[error("file not found in archive: {path}")]
    MissingFile {
        /// The logical path that was requested.
        path: String,
    },

    /// A logical archive path is empty or escapes the archive root.
    #[error("invalid archive path: {0}")]
    InvalidPath(String),

    // ==================== BMG Format Errors ====================
    /// A section header has the wrong magic or impossible sizes.
    #[error("malformed {section} header: {message}")]
    MalformedHeader {
        /// The section being read (`MESGbmg1`, `INF1`, `DAT1`).
        section: &'static str,
        /// Description of what is wrong.
        message: String,
    },

    /// Declared counts or offsets point past the end of the data.
    #[error("truncated data at offset {offset:#x} (need {needed} bytes, have {available})")]
    TruncatedData {
        /// Offset at which the read was attempted.
        offset: usize,
        /// Number of bytes the read needed.
        needed: usize,
        /// Number of bytes actually available.
        available: usize,
    },

    /// A string in the text data section has no null terminator.
    #[error("unterminated text at offset {offset:#x}")]
    TruncatedText {
        /// Absolute offset of the string start.
        offset: usize,
    },

    /// The header names an encoding this crate does not know.
    #[error("unsupported text encoding tag: {tag}")]
    UnsupportedEncoding {
        /// The raw tag byte.
        tag: u8,
    },

    /// Text contains characters the bank's encoding cannot represent.
    #[error("text cannot be encoded as {encoding}: {text:?}")]
    UnencodableText {
        /// Name of the target encoding.
        encoding: &'static str,
        /// The offending text run.
        text: String,
    },

    /// An escape tag in message text could not be parsed.
    #[error("invalid escape tag {tag:?}: {message}")]
    InvalidEscapeTag {
        /// The tag as written in the text.
        tag: String,
        /// Description of what is wrong.
        message: String,
    },

    /// A message refers to a message id that is not in the bank.
    #[error("message {from} refers to missing message {to}")]
    UnresolvedReference {
        /// Id of the referring message.
        from: u16,
        /// The id that could not be found.
        to: u16,
    },

    /// A value does not fit the field the format reserves for it.
    #[error("{what} exceeds the format limit")]
    Overflow {
        /// Description of the value.
        what: String,
    },

    // ==================== Parsing Errors ====================
    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        match err.into_io_error() {
            Some(io) => Error::Io(io),
            None => Error::Io(std::io::Error::other("directory walk loop detected")),
        }
    }
}

/// A specialized Result type for `WindText` operations.
pub type Result<T> = std::result::Result<T, Error>;
