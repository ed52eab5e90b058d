//! Legacy Western glyph remap
//!
//! The localized Windows-1252 banks reuse 0x84-0x8F for Baltic and Turkish
//! letters that the code page itself maps to punctuation. These bytes bypass
//! Windows-1252 entirely in both directions.

/// First byte covered by the remap.
pub const REMAP_FIRST: u8 = 0x84;

/// Last byte covered by the remap (inclusive).
pub const REMAP_LAST: u8 = 0x8F;

/// Glyphs for bytes `0x84..=0x8F`, in byte order.
const REMAP_TABLE: [char; 12] = [
    'Ğ', 'Ž', 'Š', 'Ą', 'Į', 'ğ', 'ž', 'š', 'ą', 'į', 'Ų', 'ų',
];

/// Look up the glyph a remapped byte stands for.
#[must_use]
pub fn byte_to_char(byte: u8) -> Option<char> {
    if (REMAP_FIRST..=REMAP_LAST).contains(&byte) {
        Some(REMAP_TABLE[usize::from(byte - REMAP_FIRST)])
    } else {
        None
    }
}

/// Look up the byte a remapped glyph is stored as.
#[must_use]
pub fn char_to_byte(ch: char) -> Option<u8> {
    REMAP_TABLE
        .iter()
        .position(|&c| c == ch)
        .map(|pos| REMAP_FIRST + pos as u8)
}
