//! Message bank editing operations
//!
//! Provides functions for modifying and querying a [`MessageBank`]:
//! - Add messages (reusing free slots first)
//! - Update text, bulk find-and-replace
//! - Search filters and reference checks
//!
//! Every mutating method marks the bank dirty.

use std::collections::HashSet;

use super::text::escape::{Segment, join_segments, split_segments};
use super::{ItemId, Message, MessageBank};
use crate::error::{Error, Result};

/// Result of a bulk replace operation
#[derive(Debug, Clone, Default)]
pub struct ReplaceResult {
    /// Number of messages modified
    pub messages_modified: usize,
    /// Total number of replacements made
    pub replacements: usize,
    /// Ids of modified messages
    pub modified_ids: Vec<u16>,
}

// ============================================================================
// MessageBank editing methods
// ============================================================================

impl MessageBank {
    /// Highest message id in the bank (0 if empty).
    #[must_use]
    pub fn highest_id(&self) -> u16 {
        self.messages().iter().map(|m| m.id).max().unwrap_or(0)
    }

    /// Add a new message
    ///
    /// The first message with id 0 is treated as a free slot: it gets the
    /// next id, a line count of 1 and no item icon, and keeps its position.
    /// Only when no free slot remains is a new message appended. This keeps
    /// the INF1 entry count stable for as long as possible.
    ///
    /// # Returns
    /// The list position of the new or reused message.
    ///
    /// # Errors
    /// Returns [`Error::Overflow`] if the highest id is already `u16::MAX`.
    pub fn add_message(&mut self) -> Result<usize> {
        let next_id = self
            .highest_id()
            .checked_add(1)
            .ok_or_else(|| Error::Overflow {
                what: "message id".to_string(),
            })?;

        let len = self.messages().len();
        let messages = self.messages_mut();

        if let Some(pos) = messages.iter().position(Message::is_free_slot) {
            let slot = &mut messages[pos];
            slot.id = next_id;
            slot.line_count = 1;
            slot.item_image = ItemId::NO_ITEM;
            tracing::debug!("Reused free slot {} for message {}", pos, next_id);
            Ok(pos)
        } else {
            let mut message = Message::new(next_id);
            message.index = len as i32;
            messages.push(message);
            tracing::debug!("Appended message {} at {}", next_id, len);
            Ok(len)
        }
    }

    /// Get the first message with the given id
    #[must_use]
    pub fn get_by_id(&self, id: u16) -> Option<&Message> {
        self.messages().iter().find(|m| m.id == id)
    }

    /// Get a mutable reference to the first message with the given id
    ///
    /// Marks the bank dirty when a message is found.
    pub fn get_by_id_mut(&mut self, id: u16) -> Option<&mut Message> {
        let pos = self.messages().iter().position(|m| m.id == id)?;
        Some(&mut self.messages_mut()[pos])
    }

    /// Replace the text of the first message with the given id
    ///
    /// # Returns
    /// `true` if the message was found and updated, `false` if not found
    pub fn set_text(&mut self, id: u16, text: impl Into<String>) -> bool {
        if let Some(message) = self.get_by_id_mut(id) {
            message.text = text.into();
            true
        } else {
            false
        }
    }

    /// Number of messages
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages().len()
    }

    /// Check if the bank has no messages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }

    /// Number of unused (id 0) slots
    #[must_use]
    pub fn free_slots(&self) -> usize {
        self.messages().iter().filter(|m| m.is_free_slot()).count()
    }

    /// Bulk replace text in all messages
    ///
    /// Only literal text is searched. Escape and raw tags are never matched
    /// or rewritten, and braces in `replace` stay literal braces. Messages
    /// whose text has a malformed tag are skipped.
    pub fn replace_all(&mut self, find: &str, replace: &str, case_sensitive: bool) -> ReplaceResult {
        let mut result = ReplaceResult::default();
        if find.is_empty() {
            return result;
        }

        let hits: Vec<(usize, String, usize)> = self
            .messages()
            .iter()
            .enumerate()
            .filter_map(|(pos, message)| {
                let (new_text, count) =
                    replace_in_literals(&message.text, find, replace, case_sensitive)?;
                (count > 0).then_some((pos, new_text, count))
            })
            .collect();

        if hits.is_empty() {
            return result;
        }

        let messages = self.messages_mut();
        for (pos, new_text, count) in hits {
            messages[pos].text = new_text;
            result.messages_modified += 1;
            result.replacements += count;
            result.modified_ids.push(messages[pos].id);
        }

        result
    }

    /// Messages matching a search filter, in list order
    ///
    /// See [`MessageFilter`] for the query syntax.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&Message> {
        let filter = MessageFilter::parse(query);
        self.messages()
            .iter()
            .enumerate()
            .filter(|(pos, message)| filter.matches(*pos, message))
            .map(|(_, message)| message)
            .collect()
    }

    /// Messages whose `next_message_id` names an id not in the bank
    ///
    /// Reported only; nothing is changed.
    #[must_use]
    pub fn unresolved_references(&self) -> Vec<Error> {
        let ids: HashSet<u16> = self.messages().iter().map(|m| m.id).collect();
        self.messages()
            .iter()
            .filter(|m| m.next_message_id != 0 && !ids.contains(&m.next_message_id))
            .map(|m| Error::UnresolvedReference {
                from: m.id,
                to: m.next_message_id,
            })
            .collect()
    }
}

// ============================================================================
// Search filter
// ============================================================================

/// Parsed search query
///
/// - empty: every message
/// - `msgid:N`: messages with id `N`
/// - `index:N`: the message currently at list position `N`
/// - `key:value` with a value that is not a 32-bit integer, or an unknown
///   key: every message
/// - anything else: case-insensitive substring of the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFilter {
    All,
    MessageId(i64),
    Index(i64),
    Text(String),
}

impl MessageFilter {
    /// Parse a query string
    #[must_use]
    pub fn parse(query: &str) -> Self {
        if query.is_empty() {
            return Self::All;
        }

        if let Some((key, rest)) = query.split_once(':') {
            // Anything after a second ':' is ignored
            let value = rest.split(':').next().unwrap_or_default();
            // Values are 32-bit; padding is allowed, out-of-range fails open
            let Ok(value) = value.trim().parse::<i32>() else {
                return Self::All;
            };
            let value = i64::from(value);
            return match key.to_lowercase().as_str() {
                "msgid" => Self::MessageId(value),
                "index" => Self::Index(value),
                _ => Self::All,
            };
        }

        Self::Text(query.to_lowercase())
    }

    /// Whether the message at list position `pos` passes the filter
    #[must_use]
    pub fn matches(&self, pos: usize, message: &Message) -> bool {
        match self {
            Self::All => true,
            Self::MessageId(id) => i64::from(message.id) == *id,
            Self::Index(index) => pos as i64 == *index,
            Self::Text(needle) => message.text.to_lowercase().contains(needle.as_str()),
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Replace inside the literal runs of a message text
///
/// Returns `None` if the text has a malformed tag.
fn replace_in_literals(
    text: &str,
    find: &str,
    replace: &str,
    case_sensitive: bool,
) -> Option<(String, usize)> {
    let Ok(mut segments) = split_segments(text) else {
        tracing::debug!("Skipping text with a malformed tag: {}", text);
        return None;
    };

    let mut total = 0;
    for segment in &mut segments {
        if let Segment::Literal(literal) = segment {
            let (new_literal, count) = if case_sensitive {
                replace_counting(literal, find, replace)
            } else {
                replace_case_insensitive_counting(literal, find, replace)
            };
            if count > 0 {
                *literal = new_literal;
                total += count;
            }
        }
    }

    if total == 0 {
        return Some((text.to_string(), 0));
    }
    Some((join_segments(&segments), total))
}

/// Replace all occurrences and count them
fn replace_counting(text: &str, find: &str, replace: &str) -> (String, usize) {
    let count = text.matches(find).count();
    if count == 0 {
        return (text.to_string(), 0);
    }
    (text.replace(find, replace), count)
}

/// Case-insensitive replace with counting
///
/// Matching is done on a lowercased copy; lowercasing that changes byte
/// lengths would misalign the copy, so such texts fall back to no match.
fn replace_case_insensitive_counting(text: &str, find: &str, replace: &str) -> (String, usize) {
    let find_lower = find.to_lowercase();
    let text_lower = text.to_lowercase();

    if text_lower.len() != text.len() || find_lower.len() != find.len() {
        return (text.to_string(), 0);
    }

    let count = text_lower.matches(&find_lower).count();
    if count == 0 {
        return (text.to_string(), 0);
    }

    // Build result preserving non-matching case
    let mut result = String::with_capacity(text.len());
    let mut last_end = 0;

    for (start, _) in text_lower.match_indices(&find_lower) {
        result.push_str(&text[last_end..start]);
        result.push_str(replace);
        last_end = start + find.len();
    }
    result.push_str(&text[last_end..]);

    (result, count)
}
