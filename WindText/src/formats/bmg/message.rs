//! A single text bank entry and its INF1 record

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use super::item::ItemId;
use crate::error::Result;

/// Size of one INF1 record as written by this crate.
pub const RECORD_SIZE: usize = 0x18;

/// One message in the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message id (0 marks an unused slot)
    pub id: u16,
    /// Position in load order
    pub index: i32,
    /// Text with escapes rendered as `{GG:TTTT:ARGS}` tags
    pub text: String,
    /// Number of lines shown per text box
    pub line_count: u16,
    /// Icon shown beside the text box
    pub item_image: ItemId,
    /// Rupee price for shop messages
    pub item_price: i16,
    /// Id of the message that follows this one (0 = none)
    pub next_message_id: u16,
    pub box_type: u8,
    pub draw_type: u8,
    pub box_position: u8,
    pub initial_sound: u8,
    pub camera_behavior: u8,
    pub speaker_anim: u8,
    /// Record bytes with no known meaning, kept verbatim
    pub unknown_1: u16,
    pub unknown_2: u8,
    pub unknown_3: u8,
    pub unknown_4: u8,
}

impl Message {
    /// Create an empty message with the given id.
    #[must_use]
    pub fn new(id: u16) -> Self {
        Self {
            id,
            index: 0,
            text: String::new(),
            line_count: 1,
            item_image: ItemId::NO_ITEM,
            item_price: 0,
            next_message_id: 0,
            box_type: 0,
            draw_type: 0,
            box_position: 0,
            initial_sound: 0,
            camera_behavior: 0,
            speaker_anim: 0,
            unknown_1: 0,
            unknown_2: 0,
            unknown_3: 0,
            unknown_4: 0,
        }
    }

    /// Whether this entry is an unused slot.
    #[must_use]
    pub fn is_free_slot(&self) -> bool {
        self.id == 0
    }

    /// Read a record (without its text), returning the message and the
    /// text offset it points at.
    pub(crate) fn read_record<R: Read>(reader: &mut R) -> Result<(Self, u32)> {
        let text_offset = reader.read_u32::<BigEndian>()?;
        let id = reader.read_u16::<BigEndian>()?;
        let item_price = reader.read_i16::<BigEndian>()?;
        let next_message_id = reader.read_u16::<BigEndian>()?;
        let unknown_1 = reader.read_u16::<BigEndian>()?;
        let box_type = reader.read_u8()?;
        let draw_type = reader.read_u8()?;
        let box_position = reader.read_u8()?;
        let item_image = ItemId(reader.read_u8()?);
        let unknown_2 = reader.read_u8()?;
        let initial_sound = reader.read_u8()?;
        let camera_behavior = reader.read_u8()?;
        let speaker_anim = reader.read_u8()?;
        let unknown_3 = reader.read_u8()?;
        let line_count = reader.read_u16::<BigEndian>()?;
        let unknown_4 = reader.read_u8()?;

        let message = Self {
            id,
            index: 0,
            text: String::new(),
            line_count,
            item_image,
            item_price,
            next_message_id,
            box_type,
            draw_type,
            box_position,
            initial_sound,
            camera_behavior,
            speaker_anim,
            unknown_1,
            unknown_2,
            unknown_3,
            unknown_4,
        };

        Ok((message, text_offset))
    }

    /// Write this message's record pointing at `text_offset`.
    pub(crate) fn write_record<W: Write>(&self, writer: &mut W, text_offset: u32) -> Result<()> {
        writer.write_u32::<BigEndian>(text_offset)?;
        writer.write_u16::<BigEndian>(self.id)?;
        writer.write_i16::<BigEndian>(self.item_price)?;
        writer.write_u16::<BigEndian>(self.next_message_id)?;
        writer.write_u16::<BigEndian>(self.unknown_1)?;
        writer.write_u8(self.box_type)?;
        writer.write_u8(self.draw_type)?;
        writer.write_u8(self.box_position)?;
        writer.write_u8(self.item_image.0)?;
        writer.write_u8(self.unknown_2)?;
        writer.write_u8(self.initial_sound)?;
        writer.write_u8(self.camera_behavior)?;
        writer.write_u8(self.speaker_anim)?;
        writer.write_u8(self.unknown_3)?;
        writer.write_u16::<BigEndian>(self.line_count)?;
        writer.write_u8(self.unknown_4)?;
        Ok(())
    }
}
