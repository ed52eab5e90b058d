//! `.bmg` file writing
//!
//! The container is assembled entirely in memory; nothing is written to disk
//! until every record and string has been encoded.

use byteorder::{BigEndian, WriteBytesExt};
use std::io::Write;
use std::path::Path;

use super::{
    BMG_MAGIC, DAT1_HEADER_SIZE, DAT1_MAGIC, HEADER_SIZE, INF1_HEADER_SIZE, INF1_MAGIC,
    INF1_PADDING, MessageBank, RECORD_SIZE, SECTION_COUNT,
};
use crate::error::{Error, Result};

/// Options for encoding a bank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Write 0 in the header's total-size field instead of the real length,
    /// as older editors did.
    pub zero_total_size: bool,
}

/// Encode a bank into `.bmg` bytes
pub fn bmg_to_bytes(bank: &MessageBank) -> Result<Vec<u8>> {
    bmg_to_bytes_with_options(bank, EncodeOptions::default())
}

/// Encode a bank into `.bmg` bytes with explicit options
///
/// # Errors
///
/// Returns [`Error::UnencodableText`] or [`Error::InvalidEscapeTag`] if a
/// message's text cannot be stored in the bank's encoding, and
/// [`Error::Overflow`] if the bank exceeds the format's size fields.
///
/// [`Error::UnencodableText`]: crate::Error::UnencodableText
/// [`Error::InvalidEscapeTag`]: crate::Error::InvalidEscapeTag
/// [`Error::Overflow`]: crate::Error::Overflow
pub fn bmg_to_bytes_with_options(bank: &MessageBank, options: EncodeOptions) -> Result<Vec<u8>> {
    let encoding = bank.encoding();
    let messages = bank.messages();

    let message_count = u16::try_from(messages.len()).map_err(|_| Error::Overflow {
        what: format!("message count {}", messages.len()),
    })?;

    // Offset 0 is the shared empty string
    let mut text_data = vec![0u8];
    let mut records = Vec::with_capacity(messages.len() * RECORD_SIZE);

    for message in messages {
        let offset = to_u32(text_data.len(), "DAT1 section")?;
        encoding.encode_into(&message.text, &mut text_data)?;
        message.write_record(&mut records, offset)?;
    }

    let inf1_size = INF1_HEADER_SIZE + records.len() + INF1_PADDING;
    let dat1_size = DAT1_HEADER_SIZE + text_data.len();
    let total_size = HEADER_SIZE + inf1_size + dat1_size;

    let mut out = Vec::with_capacity(total_size);

    // File header
    out.write_all(BMG_MAGIC)?;
    if options.zero_total_size {
        out.write_u32::<BigEndian>(0)?;
    } else {
        out.write_u32::<BigEndian>(to_u32(total_size, "file")?)?;
    }
    out.write_u32::<BigEndian>(SECTION_COUNT)?;
    out.write_u8(encoding.tag())?;
    out.write_all(&[0u8; 15])?;

    // INF1
    out.write_all(INF1_MAGIC)?;
    out.write_u32::<BigEndian>(to_u32(inf1_size, "INF1 section")?)?;
    out.write_u16::<BigEndian>(message_count)?;
    out.write_u16::<BigEndian>(RECORD_SIZE as u16)?;
    out.write_all(&[0u8; 4])?;
    out.write_all(&records)?;
    out.write_all(&[0u8; INF1_PADDING])?;

    // DAT1
    out.write_all(DAT1_MAGIC)?;
    out.write_u32::<BigEndian>(to_u32(dat1_size, "DAT1 section")?)?;
    out.write_all(&text_data)?;

    tracing::debug!(
        "Encoded BMG: {} messages, INF1 {:#x} bytes, DAT1 {:#x} bytes, total {:#x}",
        message_count,
        inf1_size,
        dat1_size,
        out.len()
    );

    Ok(out)
}

/// Write a .bmg file to disk
///
/// # Errors
/// Returns an error if encoding or file writing fails.
pub fn write_bmg<P: AsRef<Path>>(path: P, bank: &MessageBank) -> Result<()> {
    let bytes = bmg_to_bytes(bank)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

impl MessageBank {
    /// Encode the bank and clear its unsaved-changes flag.
    ///
    /// The flag is left untouched if encoding fails.
    pub fn save_bytes(&mut self, options: EncodeOptions) -> Result<Vec<u8>> {
        let bytes = bmg_to_bytes_with_options(self, options)?;
        self.mark_saved();
        Ok(bytes)
    }

    /// Encode the bank to a file and clear its unsaved-changes flag.
    pub fn save_file<P: AsRef<Path>>(&mut self, path: P, options: EncodeOptions) -> Result<()> {
        let bytes = bmg_to_bytes_with_options(self, options)?;
        std::fs::write(path, bytes)?;
        self.mark_saved();
        Ok(())
    }
}

fn to_u32(len: usize, what: &str) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::Overflow {
        what: format!("{what} size {len}"),
    })
}
