//! `.bmg` file reading and parsing

use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use super::{
    BMG_MAGIC, DAT1_HEADER_SIZE, DAT1_MAGIC, HEADER_SIZE, INF1_HEADER_SIZE, INF1_MAGIC,
    Message, MessageBank, RECORD_SIZE, SECTION_COUNT, TextEncoding,
};
use crate::error::{Error, Result};

/// Read a .bmg file from disk
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, or any error
/// [`parse_bmg_bytes`] reports.
///
/// [`Error::Io`]: crate::Error::Io
pub fn read_bmg<P: AsRef<Path>>(path: P) -> Result<MessageBank> {
    let buffer = std::fs::read(path)?;
    parse_bmg_bytes(&buffer)
}

/// Parse .bmg data from bytes
///
/// Decoding is all-or-nothing: any error discards the messages read so far.
///
/// # Errors
///
/// Returns [`Error::MalformedHeader`] if a section magic or size is wrong,
/// [`Error::TruncatedData`] / [`Error::TruncatedText`] if declared counts or
/// offsets run past the buffer, and [`Error::UnsupportedEncoding`] for an
/// unknown encoding tag.
///
/// [`Error::MalformedHeader`]: crate::Error::MalformedHeader
/// [`Error::TruncatedData`]: crate::Error::TruncatedData
/// [`Error::TruncatedText`]: crate::Error::TruncatedText
/// [`Error::UnsupportedEncoding`]: crate::Error::UnsupportedEncoding
pub fn parse_bmg_bytes(data: &[u8]) -> Result<MessageBank> {
    ensure(data, 0, HEADER_SIZE + INF1_HEADER_SIZE)?;
    let mut cursor = Cursor::new(data);

    // File header (32 bytes)
    let mut magic = [0u8; 8];
    cursor.read_exact(&mut magic)?;
    if &magic != BMG_MAGIC {
        return Err(Error::MalformedHeader {
            section: "MESGbmg1",
            message: format!("unexpected magic {:?}", String::from_utf8_lossy(&magic)),
        });
    }

    let total_size = cursor.read_u32::<BigEndian>()?;
    let section_count = cursor.read_u32::<BigEndian>()?;
    let encoding = TextEncoding::from_tag(cursor.read_u8()?)?;

    if total_size != 0 && total_size as usize != data.len() {
        tracing::debug!(
            "Header total size {} differs from buffer length {}",
            total_size,
            data.len()
        );
    }
    if section_count != SECTION_COUNT {
        tracing::warn!(
            "Bank declares {} sections; only INF1 and DAT1 are read",
            section_count
        );
    }

    // INF1 header
    let inf1_start = HEADER_SIZE;
    cursor.seek(SeekFrom::Start(inf1_start as u64))?;

    let mut inf1_magic = [0u8; 4];
    cursor.read_exact(&mut inf1_magic)?;
    if &inf1_magic != INF1_MAGIC {
        return Err(Error::MalformedHeader {
            section: "INF1",
            message: format!("unexpected magic {:?}", String::from_utf8_lossy(&inf1_magic)),
        });
    }

    let inf1_size = cursor.read_u32::<BigEndian>()? as usize;
    let message_count = usize::from(cursor.read_u16::<BigEndian>()?);
    let stride = cursor.read_i16::<BigEndian>()?;
    cursor.seek(SeekFrom::Current(4))?;

    let stride = usize::try_from(stride)
        .ok()
        .filter(|&s| s >= RECORD_SIZE)
        .ok_or_else(|| Error::MalformedHeader {
            section: "INF1",
            message: format!("record stride {stride} is smaller than {RECORD_SIZE}"),
        })?;

    let records_start = inf1_start + INF1_HEADER_SIZE;
    let records_len = message_count * stride;
    ensure(data, records_start, records_len)?;

    if inf1_size < INF1_HEADER_SIZE + records_len {
        return Err(Error::MalformedHeader {
            section: "INF1",
            message: format!(
                "section size {inf1_size:#x} cannot hold {message_count} records of {stride:#x} bytes"
            ),
        });
    }

    // DAT1 header sits directly before the text payload
    let dat1_start = inf1_start + inf1_size;
    ensure(data, dat1_start, DAT1_HEADER_SIZE)?;
    cursor.seek(SeekFrom::Start(dat1_start as u64))?;

    let mut dat1_magic = [0u8; 4];
    cursor.read_exact(&mut dat1_magic)?;
    if &dat1_magic != DAT1_MAGIC {
        return Err(Error::MalformedHeader {
            section: "DAT1",
            message: format!(
                "unexpected magic {:?} at {dat1_start:#x}",
                String::from_utf8_lossy(&dat1_magic)
            ),
        });
    }

    let dat1_size = cursor.read_u32::<BigEndian>()? as usize;
    if dat1_size < DAT1_HEADER_SIZE {
        return Err(Error::MalformedHeader {
            section: "DAT1",
            message: format!("section size {dat1_size:#x} is smaller than its header"),
        });
    }

    let text_start = dat1_start + DAT1_HEADER_SIZE;
    let text_end = dat1_start.saturating_add(dat1_size).min(data.len());
    let text_pool = &data[..text_end];

    tracing::debug!(
        "BMG: {} messages, encoding {}, stride {:#x}, text data {:#x}..{:#x}",
        message_count,
        encoding,
        stride,
        text_start,
        text_end
    );

    // Records
    let mut messages = Vec::with_capacity(message_count);
    for i in 0..message_count {
        cursor.seek(SeekFrom::Start((records_start + i * stride) as u64))?;
        let (mut message, text_offset) = Message::read_record(&mut cursor)?;

        message.index = i as i32;
        message.text = if text_offset == 0 {
            String::new()
        } else {
            let absolute = text_start + text_offset as usize;
            if absolute >= text_end {
                return Err(Error::TruncatedData {
                    offset: absolute,
                    needed: encoding.unit_width(),
                    available: 0,
                });
            }
            encoding.decode_at(text_pool, absolute)?
        };

        messages.push(message);
    }

    Ok(MessageBank::from_messages(encoding, messages))
}

fn ensure(data: &[u8], offset: usize, len: usize) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= data.len() => Ok(()),
        _ => Err(Error::TruncatedData {
            offset,
            needed: len,
            available: data.len().saturating_sub(offset),
        }),
    }
}
