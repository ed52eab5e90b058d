//! Text encodings used by message banks
//!
//! The BMG header carries a one-byte encoding tag that applies to every
//! string in the data section. This module maps the tag to a codec and
//! converts null-terminated byte runs to and from message text, rendering
//! embedded escapes as tags (see [`escape`]).

pub mod escape;
pub mod remap;

use std::fmt;

use encoding_rs::{SHIFT_JIS, UTF_16BE, WINDOWS_1252};
use serde::{Deserialize, Serialize};

use encoding_rs::Encoding;

use self::escape::{ESCAPE_CODE, EscapeSequence, Segment, push_literal, push_raw, split_segments};
use crate::error::{Error, Result};

/// Text encoding of a message bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Windows-1252 with the 0x84-0x8F glyph remap
    LegacyWestern,
    /// Shift-JIS
    LegacyJapanese,
    /// UTF-16, big-endian
    Utf16Be,
    /// UTF-8
    Utf8,
}

impl TextEncoding {
    /// All supported encodings, in tag order.
    pub const ALL: [TextEncoding; 4] = [
        TextEncoding::LegacyWestern,
        TextEncoding::LegacyJapanese,
        TextEncoding::Utf16Be,
        TextEncoding::Utf8,
    ];

    /// Map a header tag byte to an encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedEncoding`] for unknown tags.
    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(Self::LegacyWestern),
            1 => Ok(Self::LegacyJapanese),
            2 => Ok(Self::Utf16Be),
            3 => Ok(Self::Utf8),
            _ => Err(Error::UnsupportedEncoding { tag }),
        }
    }

    /// The header tag byte for this encoding.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::LegacyWestern => 0,
            Self::LegacyJapanese => 1,
            Self::Utf16Be => 2,
            Self::Utf8 => 3,
        }
    }

    /// Human-readable encoding name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::LegacyWestern => "windows-1252",
            Self::LegacyJapanese => "Shift_JIS",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf8 => "UTF-8",
        }
    }

    /// Width of one code unit in bytes (also the width of the terminator).
    #[must_use]
    pub fn unit_width(self) -> usize {
        match self {
            Self::Utf16Be => 2,
            _ => 1,
        }
    }

    /// Decode the null-terminated string starting at `offset` in `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TruncatedText`] if no terminator is found before the
    /// end of `data`, or [`Error::TruncatedData`] if an escape runs past it.
    pub fn decode_at(self, data: &[u8], offset: usize) -> Result<String> {
        let width = self.unit_width();
        let mut out = String::new();
        let mut pos = offset;
        let mut literal_start = offset;

        loop {
            if pos + width > data.len() {
                return Err(Error::TruncatedText { offset });
            }

            let unit = if width == 2 {
                u16::from_be_bytes([data[pos], data[pos + 1]])
            } else {
                u16::from(data[pos])
            };

            match unit {
                0 => {
                    self.decode_run(&data[literal_start..pos], &mut out);
                    return Ok(out);
                }
                ESCAPE_CODE => {
                    self.decode_run(&data[literal_start..pos], &mut out);
                    let (esc, used) = EscapeSequence::read(&data[pos..], width, pos)?;
                    out.push_str(&esc.to_string());
                    pos += used;
                    literal_start = pos;
                }
                _ => pos += width,
            }
        }
    }

    /// Encode message text, appending the bytes and a null terminator to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEscapeTag`] for malformed tags and
    /// [`Error::UnencodableText`] for characters the encoding cannot store.
    pub fn encode_into(self, text: &str, out: &mut Vec<u8>) -> Result<()> {
        for segment in split_segments(text)? {
            match segment {
                Segment::Literal(s) => self.encode_run(&s, out)?,
                Segment::Escape(esc) => esc.write(self.unit_width(), out)?,
                Segment::Raw(bytes) => self.write_raw(&bytes, out)?,
            }
        }
        out.extend(std::iter::repeat_n(0u8, self.unit_width()));
        Ok(())
    }

    /// Encode message text into a new null-terminated buffer.
    pub fn encode(self, text: &str) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len() * self.unit_width() + 2);
        self.encode_into(text, &mut out)?;
        Ok(out)
    }

    fn decode_run(self, bytes: &[u8], out: &mut String) {
        if bytes.is_empty() {
            return;
        }

        match self {
            Self::LegacyWestern => {
                // Remapped bytes split the run into Windows-1252 chunks
                for chunk in bytes.split_inclusive(|&b| remap::byte_to_char(b).is_some()) {
                    let (plain, tail) = match chunk.split_last() {
                        Some((&last, rest)) if remap::byte_to_char(last).is_some() => {
                            (rest, remap::byte_to_char(last))
                        }
                        _ => (chunk, None),
                    };
                    let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(plain);
                    push_literal(out, &decoded);
                    if let Some(ch) = tail {
                        out.push(ch);
                    }
                }
            }
            Self::LegacyJapanese | Self::Utf16Be | Self::Utf8 => {
                let codec = self.codec();
                if let Some(decoded) = codec.decode_without_bom_handling_and_without_replacement(bytes) {
                    push_literal(out, &decoded);
                    return;
                }
                let kept = self.decode_run_keeping_raw(codec, bytes, out);
                tracing::warn!(
                    "Kept {} undecodable {} bytes as raw tags",
                    kept,
                    self.name()
                );
            }
        }
    }

    fn codec(self) -> &'static Encoding {
        match self {
            Self::LegacyWestern => WINDOWS_1252,
            Self::LegacyJapanese => SHIFT_JIS,
            Self::Utf16Be => UTF_16BE,
            Self::Utf8 => encoding_rs::UTF_8,
        }
    }

    /// Decode a run that contains malformed sequences, one character at a
    /// time, writing undecodable code units as `{RAW:..}` tags.
    ///
    /// Returns the number of raw bytes kept.
    fn decode_run_keeping_raw(self, codec: &'static Encoding, bytes: &[u8], out: &mut String) -> usize {
        let width = self.unit_width();
        let max_len = match self {
            Self::LegacyJapanese => 2,
            _ => 4,
        };

        let mut raw = Vec::new();
        let mut kept = 0;
        let mut pos = 0;

        while pos < bytes.len() {
            let decoded = (width..=max_len).step_by(width).find_map(|len| {
                let chunk = bytes.get(pos..pos + len)?;
                codec
                    .decode_without_bom_handling_and_without_replacement(chunk)
                    .map(|text| (text.into_owned(), len))
            });

            match decoded {
                Some((text, len)) => {
                    push_raw(out, &raw);
                    raw.clear();
                    push_literal(out, &text);
                    pos += len;
                }
                None => {
                    let end = (pos + width).min(bytes.len());
                    raw.extend_from_slice(&bytes[pos..end]);
                    kept += end - pos;
                    pos = end;
                }
            }
        }

        push_raw(out, &raw);
        kept
    }

    /// Write bytes kept from an undecodable run.
    fn write_raw(self, bytes: &[u8], out: &mut Vec<u8>) -> Result<()> {
        let width = self.unit_width();
        let invalid = |message: &str| Error::InvalidEscapeTag {
            tag: {
                let mut tag = String::new();
                push_raw(&mut tag, bytes);
                tag
            },
            message: message.to_string(),
        };

        if bytes.len() % width != 0 {
            return Err(invalid("raw bytes do not fill whole code units"));
        }
        let reserved = bytes.chunks(width).any(|unit| {
            let unit = unit.iter().fold(0u16, |acc, &b| (acc << 8) | u16::from(b));
            unit == 0 || unit == ESCAPE_CODE
        });
        if reserved {
            return Err(invalid("raw bytes contain a terminator or escape code"));
        }

        out.extend_from_slice(bytes);
        Ok(())
    }

    fn encode_run(self, text: &str, out: &mut Vec<u8>) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        if text.contains(['\0', '\u{1A}']) {
            return Err(self.unencodable(text));
        }

        match self {
            Self::LegacyWestern => {
                let mut plain = String::new();
                for ch in text.chars() {
                    if let Some(byte) = remap::char_to_byte(ch) {
                        self.encode_western(&plain, out)?;
                        plain.clear();
                        out.push(byte);
                    } else {
                        plain.push(ch);
                    }
                }
                self.encode_western(&plain, out)?;
            }
            Self::LegacyJapanese => {
                let (encoded, _, had_errors) = SHIFT_JIS.encode(text);
                if had_errors {
                    return Err(self.unencodable(text));
                }
                out.extend_from_slice(&encoded);
            }
            Self::Utf16Be => {
                for unit in text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
            }
            Self::Utf8 => out.extend_from_slice(text.as_bytes()),
        }

        Ok(())
    }

    fn encode_western(self, text: &str, out: &mut Vec<u8>) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let (encoded, _, had_errors) = WINDOWS_1252.encode(text);
        // Native glyphs at 0x84-0x8F would read back as remapped letters
        if had_errors || encoded.iter().any(|&b| remap::byte_to_char(b).is_some()) {
            return Err(self.unencodable(text));
        }
        out.extend_from_slice(&encoded);
        Ok(())
    }

    fn unencodable(self, text: &str) -> Error {
        Error::UnencodableText {
            encoding: self.name(),
            text: text.to_string(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_mapping() {
        for encoding in TextEncoding::ALL {
            assert_eq!(TextEncoding::from_tag(encoding.tag()).unwrap(), encoding);
        }
        assert!(matches!(
            TextEncoding::from_tag(99),
            Err(Error::UnsupportedEncoding { tag: 99 })
        ));
    }

    #[test]
    fn test_western_remap_decode() {
        let data = [b'A', 0x86, b'B', 0x00];
        let text = TextEncoding::LegacyWestern.decode_at(&data, 0).unwrap();
        assert_eq!(text, "AŠB");
    }

    #[test]
    fn test_western_remap_encode() {
        let bytes = TextEncoding::LegacyWestern.encode("Š").unwrap();
        assert_eq!(bytes, vec![0x86, 0x00]);
    }

    #[test]
    fn test_western_native_glyphs() {
        // 0xE9 is é in Windows-1252, untouched by the remap
        let data = [b'c', b'a', b'f', 0xE9, 0x00];
        let text = TextEncoding::LegacyWestern.decode_at(&data, 0).unwrap();
        assert_eq!(text, "café");
        assert_eq!(TextEncoding::LegacyWestern.encode("café").unwrap(), data.to_vec());
    }

    #[test]
    fn test_western_rejects_shadowed_glyphs() {
        // U+2020 (dagger) is 0x86 in Windows-1252, which the remap owns
        assert!(matches!(
            TextEncoding::LegacyWestern.encode("\u{2020}"),
            Err(Error::UnencodableText { .. })
        ));
        assert!(TextEncoding::LegacyWestern.encode("日本").is_err());
    }

    #[test]
    fn test_shift_jis() {
        let bytes = TextEncoding::LegacyJapanese.encode("リンク").unwrap();
        assert_eq!(bytes, vec![0x83, 0x8A, 0x83, 0x93, 0x83, 0x4E, 0x00]);
        let text = TextEncoding::LegacyJapanese.decode_at(&bytes, 0).unwrap();
        assert_eq!(text, "リンク");
    }

    #[test]
    fn test_utf16_terminator_is_two_bytes() {
        let bytes = TextEncoding::Utf16Be.encode("Hi").unwrap();
        assert_eq!(bytes, vec![0x00, b'H', 0x00, b'i', 0x00, 0x00]);
        let text = TextEncoding::Utf16Be.decode_at(&bytes, 0).unwrap();
        assert_eq!(text, "Hi");
    }

    #[test]
    fn test_decode_at_offset() {
        let data = b"\0first\0second\0";
        assert_eq!(TextEncoding::Utf8.decode_at(data, 0).unwrap(), "");
        assert_eq!(TextEncoding::Utf8.decode_at(data, 1).unwrap(), "first");
        assert_eq!(TextEncoding::Utf8.decode_at(data, 7).unwrap(), "second");
    }

    #[test]
    fn test_missing_terminator() {
        assert!(matches!(
            TextEncoding::Utf8.decode_at(b"abc", 0),
            Err(Error::TruncatedText { offset: 0 })
        ));
        assert!(TextEncoding::Utf16Be.decode_at(&[0x00, b'a', 0x00], 0).is_err());
    }

    #[test]
    fn test_escape_with_zero_args_is_not_a_terminator() {
        // Escape carrying zero bytes in its arguments, then more text
        let data = [b'A', 0x1A, 0x07, 0x00, 0x00, 0x05, 0x00, 0x00, b'B', 0x00];
        let text = TextEncoding::LegacyWestern.decode_at(&data, 0).unwrap();
        assert_eq!(text, "A{00:0005:0000}B");
        assert_eq!(TextEncoding::LegacyWestern.encode(&text).unwrap(), data.to_vec());
    }

    #[test]
    fn test_escapes_survive_every_encoding() {
        let text = "Hey {00:0000}! {FF:0000:02}Listen{FF:0000:00} {{ok}";
        for encoding in TextEncoding::ALL {
            let bytes = encoding.encode(text).unwrap();
            assert_eq!(encoding.decode_at(&bytes, 0).unwrap(), text, "{encoding}");
        }
    }

    #[test]
    fn test_malformed_shift_jis_is_kept() {
        // 0xA0 is not a Shift-JIS character
        let data = [b'A', 0xA0, 0x83, 0x8A, 0x00];
        let text = TextEncoding::LegacyJapanese.decode_at(&data, 0).unwrap();
        assert_eq!(text, "A{RAW:A0}リ");
        assert_eq!(TextEncoding::LegacyJapanese.encode(&text).unwrap(), data.to_vec());
    }

    #[test]
    fn test_malformed_utf8_is_kept() {
        let data = [b'o', 0xFF, 0xC3, b'k', 0xC3, 0xA9, 0x00];
        let text = TextEncoding::Utf8.decode_at(&data, 0).unwrap();
        assert_eq!(text, "o{RAW:FFC3}ké");
        assert_eq!(TextEncoding::Utf8.encode(&text).unwrap(), data.to_vec());
    }

    #[test]
    fn test_unpaired_surrogate_is_kept() {
        let data = [0xD8, 0x00, 0x00, b'x', 0x00, 0x00];
        let text = TextEncoding::Utf16Be.decode_at(&data, 0).unwrap();
        assert_eq!(text, "{RAW:D800}x");
        assert_eq!(TextEncoding::Utf16Be.encode(&text).unwrap(), data.to_vec());
    }

    #[test]
    fn test_raw_tags_cannot_hold_reserved_units() {
        assert!(TextEncoding::Utf8.encode("{RAW:00}").is_err());
        assert!(TextEncoding::Utf8.encode("{RAW:1A}").is_err());
        assert!(TextEncoding::Utf16Be.encode("{RAW:D8}").is_err());
        assert!(TextEncoding::Utf16Be.encode("{RAW:001A}").is_err());
    }

    #[test]
    fn test_control_characters_are_rejected() {
        for encoding in TextEncoding::ALL {
            assert!(encoding.encode("a\0b").is_err());
            assert!(encoding.encode("a\u{1A}b").is_err());
        }
    }
}
