//! CSV export
//!
//! One row per message, in list order:
//!
//! ```csv
//! ID,Text
//! 0,"Hello"
//! 1,"He said \"hi\""
//! ```
//!
//! The first column is the message's list index. Quotes inside the text are
//! backslash-escaped, which is what the existing translation sheets expect.

use std::fmt::Write as _;
use std::path::Path;

use super::MessageBank;
use crate::error::Result;

/// Render the bank as CSV text
#[must_use]
pub fn build_csv(bank: &MessageBank) -> String {
    build_csv_with_header(bank, true)
}

/// Render the bank as CSV text, optionally without the header row
#[must_use]
pub fn build_csv_with_header(bank: &MessageBank, header: bool) -> String {
    let mut output = String::new();
    if header {
        output.push_str("ID,Text\n");
    }

    for message in bank.messages() {
        let _ = writeln!(output, "{},\"{}\"", message.index, escape_quotes(&message.text));
    }

    output
}

/// Export the bank to a CSV file
///
/// # Returns
/// The number of rows written (header excluded).
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_csv<P: AsRef<Path>>(bank: &MessageBank, path: P, header: bool) -> Result<usize> {
    std::fs::write(path, build_csv_with_header(bank, header))?;
    Ok(bank.len())
}

fn escape_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::bmg::{Message, TextEncoding};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_quotes(r#"He said "hi""#), r#"He said \"hi\""#);
    }

    #[test]
    fn test_build_csv() {
        let mut first = Message::new(10);
        first.text = "Hello".to_string();
        let mut second = Message::new(11);
        second.text = r#"He said "hi""#.to_string();

        let bank = MessageBank::from_messages(TextEncoding::Utf8, vec![first, second]);
        let csv = build_csv(&bank);
        assert_eq!(csv, "ID,Text\n0,\"Hello\"\n1,\"He said \\\"hi\\\"\"\n");

        let without_header = build_csv_with_header(&bank, false);
        assert!(without_header.starts_with("0,"));
    }
}
