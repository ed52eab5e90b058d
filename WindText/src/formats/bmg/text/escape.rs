//! Control-code escapes embedded in message text
//!
//! On disk an escape is the code unit `0x1A` followed by a length byte
//! (counting the whole escape), a group byte, a big-endian `u16` type and
//! the remaining bytes as arguments:
//!
//! ```text
//! 1A | len | group | type_hi type_lo | args...        (8-bit encodings)
//! 00 1A | len | group | type_hi type_lo | args...     (UTF-16BE)
//! ```
//!
//! In decoded text an escape is written as a tag, `{GG:TTTT}` or
//! `{GG:TTTT:AABB..}` in hexadecimal. A literal brace is written `{{`.
//!
//! Bytes the bank's encoding cannot decode are kept as `{RAW:AABB..}` and
//! written back unchanged.

use std::fmt::{self, Write as _};

use crate::error::{Error, Result};

/// Code unit that starts an escape sequence.
pub const ESCAPE_CODE: u16 = 0x1A;

/// Bytes following the start code unit before the arguments begin
/// (length, group, type).
const ESCAPE_HEADER_SIZE: usize = 4;

/// Tag name for undecodable bytes.
pub const RAW_TAG: &str = "RAW";

/// A single control escape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EscapeSequence {
    /// Escape group (0x00 = generic, 0xFF = color, ...)
    pub group: u8,
    /// Escape type within the group
    pub kind: u16,
    /// Raw argument bytes
    pub args: Vec<u8>,
}

/// A piece of message text: either literal characters or one escape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Plain text with `{{` already collapsed to `{`
    Literal(String),
    /// A control escape
    Escape(EscapeSequence),
    /// Bytes stored as-is
    Raw(Vec<u8>),
}

impl EscapeSequence {
    /// Create an escape without arguments.
    #[must_use]
    pub fn new(group: u8, kind: u16) -> Self {
        Self {
            group,
            kind,
            args: Vec::new(),
        }
    }

    /// Total on-disk size for an encoding whose code unit is `unit_width` bytes.
    #[must_use]
    pub fn byte_len(&self, unit_width: usize) -> usize {
        unit_width + ESCAPE_HEADER_SIZE + self.args.len()
    }

    /// Read an escape from `data`, which must start at the escape code unit.
    ///
    /// `base` is the absolute offset of `data[0]`, used for error reporting.
    /// Returns the escape and the number of bytes it occupies.
    pub fn read(data: &[u8], unit_width: usize, base: usize) -> Result<(Self, usize)> {
        let min_len = unit_width + ESCAPE_HEADER_SIZE;
        if data.len() < unit_width + 1 {
            return Err(Error::TruncatedData {
                offset: base,
                needed: min_len,
                available: data.len(),
            });
        }

        let len = usize::from(data[unit_width]);
        if len < min_len {
            return Err(Error::TruncatedData {
                offset: base,
                needed: min_len,
                available: len,
            });
        }
        if data.len() < len {
            return Err(Error::TruncatedData {
                offset: base,
                needed: len,
                available: data.len(),
            });
        }

        let group = data[unit_width + 1];
        let kind = u16::from_be_bytes([data[unit_width + 2], data[unit_width + 3]]);
        let args = data[min_len..len].to_vec();

        Ok((Self { group, kind, args }, len))
    }

    /// Append the on-disk form of this escape, start code unit included.
    pub fn write(&self, unit_width: usize, out: &mut Vec<u8>) -> Result<()> {
        let len = self.byte_len(unit_width);
        let len = u8::try_from(len).map_err(|_| Error::Overflow {
            what: format!("escape {self} ({len} bytes)"),
        })?;

        if unit_width == 2 {
            out.extend_from_slice(&ESCAPE_CODE.to_be_bytes());
        } else {
            out.push(ESCAPE_CODE as u8);
        }
        out.push(len);
        out.push(self.group);
        out.extend_from_slice(&self.kind.to_be_bytes());
        out.extend_from_slice(&self.args);
        Ok(())
    }

    /// Parse the inside of a tag (the text between the braces).
    pub fn parse_tag(body: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidEscapeTag {
            tag: format!("{{{body}}}"),
            message: message.to_string(),
        };

        let mut parts = body.split(':');
        let group = parts
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid("missing group"))?;
        let kind = parts.next().ok_or_else(|| invalid("missing type"))?;
        let args = parts.next().unwrap_or("");
        if parts.next().is_some() {
            return Err(invalid("too many fields"));
        }

        let group = u8::from_str_radix(group, 16).map_err(|_| invalid("group is not a hex byte"))?;
        let kind = u16::from_str_radix(kind, 16).map_err(|_| invalid("type is not a hex u16"))?;
        let args = parse_hex(args).ok_or_else(|| invalid("arguments are not hex bytes"))?;

        Ok(Self { group, kind, args })
    }
}

impl fmt::Display for EscapeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{:02X}:{:04X}", self.group, self.kind)?;
        if !self.args.is_empty() {
            f.write_char(':')?;
            for byte in &self.args {
                write!(f, "{byte:02X}")?;
            }
        }
        f.write_char('}')
    }
}

/// Append literal text to decoded output, doubling braces.
pub fn push_literal(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch == '{' {
            out.push_str("{{");
        } else {
            out.push(ch);
        }
    }
}

/// Append a `{RAW:..}` tag for undecodable bytes.
pub fn push_raw(out: &mut String, bytes: &[u8]) {
    if bytes.is_empty() {
        return;
    }
    out.push('{');
    out.push_str(RAW_TAG);
    out.push(':');
    for byte in bytes {
        let _ = write!(out, "{byte:02X}");
    }
    out.push('}');
}

/// Render segments back into message text.
#[must_use]
pub fn join_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => push_literal(&mut out, text),
            Segment::Escape(esc) => {
                let _ = write!(out, "{esc}");
            }
            Segment::Raw(bytes) => push_raw(&mut out, bytes),
        }
    }
    out
}

/// Split message text into literal runs, escapes and raw bytes.
pub fn split_segments(text: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(open) = rest.find('{') {
        literal.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        if let Some(stripped) = after.strip_prefix('{') {
            literal.push('{');
            rest = stripped;
            continue;
        }

        let close = after.find('}').ok_or_else(|| Error::InvalidEscapeTag {
            tag: rest[open..].chars().take(16).collect(),
            message: "unterminated tag".to_string(),
        })?;

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        let body = &after[..close];
        let segment = match body.strip_prefix(RAW_TAG).and_then(|r| r.strip_prefix(':')) {
            Some(hex) => Segment::Raw(parse_hex(hex).filter(|b| !b.is_empty()).ok_or_else(|| {
                Error::InvalidEscapeTag {
                    tag: format!("{{{body}}}"),
                    message: "raw bytes are not hex".to_string(),
                }
            })?),
            None => Segment::Escape(EscapeSequence::parse_tag(body)?),
        };
        segments.push(segment);
        rest = &after[close + 1..];
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(segments)
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
