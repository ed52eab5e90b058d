//! CLI commands for message bank operations

use std::fs;
use std::path::Path;

use crate::archive::{BankSession, DirectoryArchive};
use crate::config::Config;
use crate::formats::bmg::{
    Message, bmg_to_bytes_with_options, build_csv_with_header, export_csv, parse_bmg_bytes,
};

/// Open the bank named by `source`
///
/// A file is opened directly (its directory acts as the archive). A directory
/// is treated as an extracted archive and the configured `bank_path` is used.
fn open_session(source: &Path, config: &Config) -> anyhow::Result<BankSession<DirectoryArchive>> {
    let (root, path) = if source.is_dir() {
        (source.to_path_buf(), config.bank_path.clone())
    } else {
        let Some(name) = source.file_name() else {
            anyhow::bail!("Not a file or directory: {}", source.display());
        };
        let root = match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        (root, name.to_string_lossy().into_owned())
    };

    let store = DirectoryArchive::open(root)?;
    Ok(BankSession::open(store, &path, config.encode_options())?)
}

/// Print bank summary
pub fn info(source: &Path, config: &Config) -> anyhow::Result<()> {
    let session = open_session(source, config)?;
    let bank = session.bank();

    println!("Bank: {}", session.path());
    println!("Encoding: {}", bank.encoding());
    println!("Messages: {}", bank.len());
    println!("Highest id: {}", bank.highest_id());
    println!("Free slots: {}", bank.free_slots());

    let unresolved = bank.unresolved_references();
    println!("Unresolved references: {}", unresolved.len());
    for problem in &unresolved {
        tracing::warn!("{problem}");
    }

    Ok(())
}

/// List messages matching a filter
pub fn list(source: &Path, config: &Config, filter: &str, limit: usize) -> anyhow::Result<()> {
    let session = open_session(source, config)?;
    let matches = session.bank().filter(filter);

    for message in matches.iter().take(limit) {
        println!(
            "{:>5}  #{:<5} {}",
            message.id,
            message.index,
            preview(&message.text, 80)
        );
    }

    if matches.len() > limit {
        println!("... and {} more", matches.len() - limit);
    }

    Ok(())
}

/// Print a single message
pub fn get(source: &Path, config: &Config, id: u16) -> anyhow::Result<()> {
    let session = open_session(source, config)?;
    let Some(message) = session.bank().get_by_id(id) else {
        anyhow::bail!("Message not found: {}", id);
    };

    print_message(message);
    Ok(())
}

/// Replace a message's text and save
pub fn set(source: &Path, config: &Config, id: u16, text: &str) -> anyhow::Result<()> {
    let mut session = open_session(source, config)?;
    if !session.bank_mut().set_text(id, text) {
        anyhow::bail!("Message not found: {}", id);
    }

    session.save()?;
    println!("Updated message: {id}");
    Ok(())
}

/// Add a message and save
pub fn add(source: &Path, config: &Config, text: Option<&str>) -> anyhow::Result<()> {
    let mut session = open_session(source, config)?;
    let bank = session.bank_mut();
    let reused = bank.free_slots() > 0;

    let pos = bank.add_message()?;
    let message = &mut bank.messages_mut()[pos];
    if let Some(text) = text {
        message.text = text.to_string();
    }
    let id = message.id;

    session.save()?;
    if reused {
        println!("Added message {id} in free slot #{pos}");
    } else {
        println!("Added message {id} at #{pos}");
    }
    Ok(())
}

/// Find and replace across the bank
pub fn replace(
    source: &Path,
    config: &Config,
    find: &str,
    replace: &str,
    case_sensitive: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut session = open_session(source, config)?;
    let result = session.bank_mut().replace_all(find, replace, case_sensitive);

    if result.replacements == 0 {
        println!("No matches for '{find}'");
        return Ok(());
    }

    println!(
        "{} replacements in {} messages",
        result.replacements, result.messages_modified
    );
    for id in &result.modified_ids {
        println!("  {id}");
    }

    if dry_run {
        println!("Dry run, nothing saved");
    } else {
        session.save()?;
    }
    Ok(())
}

/// Export the bank as CSV
pub fn export(source: &Path, config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let session = open_session(source, config)?;
    let header = config.export.csv_header;

    match output {
        Some(path) => {
            let rows = export_csv(session.bank(), path, header)?;
            println!("Exported {} messages to {}", rows, path.display());
        }
        None => print!("{}", build_csv_with_header(session.bank(), header)),
    }
    Ok(())
}

/// Dump the bank as JSON
pub fn dump(source: &Path, config: &Config, output: Option<&Path>) -> anyhow::Result<()> {
    let session = open_session(source, config)?;
    let json = serde_json::to_string_pretty(session.bank())?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Check that encode, decode and encode again yields identical bytes
pub fn verify(source: &Path, config: &Config) -> anyhow::Result<()> {
    let session = open_session(source, config)?;
    let options = config.encode_options();

    let first = bmg_to_bytes_with_options(session.bank(), options)?;
    let decoded = parse_bmg_bytes(&first)?;
    let second = bmg_to_bytes_with_options(&decoded, options)?;

    if first != second {
        anyhow::bail!("Re-encoding is not stable ({} vs {} bytes)", first.len(), second.len());
    }
    if decoded.messages() != session.bank().messages() {
        anyhow::bail!("Decoded messages differ after re-encoding");
    }

    println!("OK: {} messages, {} bytes", decoded.len(), first.len());
    Ok(())
}

fn print_message(message: &Message) {
    println!("Id: {}", message.id);
    println!("Index: {}", message.index);
    println!("Lines: {}", message.line_count);
    println!("Item: {}", message.item_image);
    if message.item_price != 0 {
        println!("Price: {}", message.item_price);
    }
    if message.next_message_id != 0 {
        println!("Next: {}", message.next_message_id);
    }
    println!(
        "Box: type {} draw {} position {}",
        message.box_type, message.draw_type, message.box_position
    );
    println!(
        "Sound {} camera {} speaker {}",
        message.initial_sound, message.camera_behavior, message.speaker_anim
    );
    println!("Text:");
    println!("{}", message.text);
}

/// Single-line preview of a message text
fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', "\\n");
    if flat.chars().count() > max_chars {
        let cut: String = flat.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
