//! Item icon catalog
//!
//! Each message record names the item icon shown beside its text box.
//! Values outside the catalog are preserved as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Item icon tag stored in a message record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u8);

impl ItemId {
    /// No icon.
    pub const NO_ITEM: ItemId = ItemId(0xFF);

    /// Catalog name for this item, if known.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        ITEM_NAMES
            .binary_search_by_key(&self.0, |&(id, _)| id)
            .ok()
            .map(|pos| ITEM_NAMES[pos].1)
    }

    /// Look up an item by its catalog name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ITEM_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|&(id, _)| ItemId(id))
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::NO_ITEM
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::NO_ITEM
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Unknown({:#04X})", self.0),
        }
    }
}

/// Known item icons, sorted by id.
const ITEM_NAMES: &[(u8, &str)] = &[
    (0x00, "Heart"),
    (0x01, "Green_Rupee"),
    (0x02, "Blue_Rupee"),
    (0x03, "Yellow_Rupee"),
    (0x04, "Red_Rupee"),
    (0x05, "Purple_Rupee"),
    (0x06, "Orange_Rupee"),
    (0x07, "Piece_of_Heart"),
    (0x08, "Heart_Container"),
    (0x09, "Small_Magic_Jar"),
    (0x0A, "Large_Magic_Jar"),
    (0x0B, "Bombs_5"),
    (0x0C, "Bombs_10"),
    (0x0D, "Bombs_20"),
    (0x0E, "Bombs_30"),
    (0x0F, "Silver_Rupee"),
    (0x10, "Arrows_10"),
    (0x11, "Arrows_20"),
    (0x12, "Arrows_30"),
    (0x15, "Small_Key"),
    (0x16, "Fairy"),
    (0x20, "Telescope"),
    (0x21, "Tingle_Tuner"),
    (0x22, "Wind_Waker"),
    (0x23, "Picto_Box"),
    (0x24, "Spoils_Bag"),
    (0x25, "Grappling_Hook"),
    (0x26, "Deluxe_Picto_Box"),
    (0x27, "Heros_Bow"),
    (0x28, "Power_Bracelets"),
    (0x29, "Iron_Boots"),
    (0x2A, "Magic_Armor"),
    (0x2C, "Bait_Bag"),
    (0x2D, "Boomerang"),
    (0x2F, "Hookshot"),
    (0x30, "Delivery_Bag"),
    (0x31, "Bombs"),
    (0x32, "Heros_Clothes"),
    (0x33, "Skull_Hammer"),
    (0x34, "Deku_Leaf"),
    (0x35, "Fire_and_Ice_Arrows"),
    (0x36, "Light_Arrow"),
    (0x38, "Heros_Sword"),
    (0x39, "Master_Sword_Powerless"),
    (0x3A, "Master_Sword_Half_Power"),
    (0x3B, "Heros_Shield"),
    (0x3C, "Mirror_Shield"),
    (0x3E, "Master_Sword_Full_Power"),
    (0x50, "Empty_Bottle"),
    (0x51, "Red_Potion"),
    (0x52, "Green_Potion"),
    (0x53, "Blue_Potion"),
    (0x59, "Forest_Water"),
    (0xFF, "No_item"),
];
