//! Loading and saving a message bank through an archive store

use super::{ArchiveStore, normalize_path};
use crate::error::{Error, Result};
use crate::formats::bmg::{EncodeOptions, MessageBank, bmg_to_bytes_with_options, parse_bmg_bytes};

impl MessageBank {
    /// Decode the bank stored at `path` in an archive.
    ///
    /// # Errors
    /// Returns [`Error::MissingFile`] if the store has no file at `path`,
    /// or any decode error.
    pub fn load_from<S: ArchiveStore + ?Sized>(store: &S, path: &str) -> Result<Self> {
        let data = store.get(path)?.ok_or_else(|| Error::MissingFile {
            path: path.to_string(),
        })?;
        let bank = parse_bmg_bytes(&data)?;
        tracing::info!(
            "Loaded {} messages ({}) from {}",
            bank.len(),
            bank.encoding(),
            path
        );
        Ok(bank)
    }

    /// Encode the bank and store it at `path`.
    ///
    /// The container is fully encoded before the store is touched. The
    /// unsaved-changes flag is cleared only once the store accepted the bytes.
    pub fn save_to<S: ArchiveStore + ?Sized>(
        &mut self,
        store: &mut S,
        path: &str,
        options: EncodeOptions,
    ) -> Result<()> {
        let bytes = bmg_to_bytes_with_options(self, options)?;
        let size = bytes.len();
        store.set(path, bytes)?;
        self.mark_saved();
        tracing::info!("Saved {} messages ({} bytes) to {}", self.len(), size, path);
        Ok(())
    }
}

/// A message bank bound to the store and path it was loaded from
#[derive(Debug)]
pub struct BankSession<S: ArchiveStore> {
    store: S,
    path: String,
    bank: MessageBank,
    options: EncodeOptions,
}

impl<S: ArchiveStore> BankSession<S> {
    /// Load the bank at `path` from `store`.
    pub fn open(store: S, path: &str, options: EncodeOptions) -> Result<Self> {
        let path = normalize_path(path)?;
        let bank = MessageBank::load_from(&store, &path)?;
        Ok(Self {
            store,
            path,
            bank,
            options,
        })
    }

    /// Logical path of the bank inside the store
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn bank(&self) -> &MessageBank {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut MessageBank {
        &mut self.bank
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.bank.is_dirty()
    }

    /// Write the bank back to its path in the store.
    pub fn save(&mut self) -> Result<()> {
        self.bank.save_to(&mut self.store, &self.path, self.options)
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give up the session, returning the store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryArchive;
    use crate::formats::bmg::{Message, TextEncoding, bmg_to_bytes};

    /// Store whose writes always fail
    struct ReadOnlyArchive(MemoryArchive);

    impl ArchiveStore for ReadOnlyArchive {
        fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
            self.0.get(path)
        }

        fn set(&mut self, _path: &str, _data: Vec<u8>) -> Result<()> {
            Err(Error::Io(std::io::Error::other("read-only")))
        }

        fn paths(&self) -> Result<Vec<String>> {
            self.0.paths()
        }
    }

    fn archive_with_bank() -> MemoryArchive {
        let mut message = Message::new(1);
        message.text = "Hello".to_string();
        let bank = MessageBank::from_messages(TextEncoding::LegacyWestern, vec![message]);

        let mut archive = MemoryArchive::new();
        archive.insert("zel_00.bmg", bmg_to_bytes(&bank).unwrap()).unwrap();
        archive
    }

    #[test]
    fn test_missing_bank() {
        let archive = MemoryArchive::new();
        assert!(matches!(
            MessageBank::load_from(&archive, "zel_00.bmg"),
            Err(Error::MissingFile { .. })
        ));
    }

    #[test]
    fn test_session_save() {
        let mut session =
            BankSession::open(archive_with_bank(), "/zel_00.bmg", EncodeOptions::default()).unwrap();
        assert_eq!(session.path(), "zel_00.bmg");
        assert!(!session.is_dirty());

        session.bank_mut().set_text(1, "Goodbye");
        assert!(session.is_dirty());
        session.save().unwrap();
        assert!(!session.is_dirty());

        let store = session.into_store();
        let reloaded = MessageBank::load_from(&store, "zel_00.bmg").unwrap();
        assert_eq!(reloaded.get_by_id(1).unwrap().text, "Goodbye");
    }

    #[test]
    fn test_failed_write_keeps_store_and_dirty_flag() {
        let original = archive_with_bank();
        let before = original.get("zel_00.bmg").unwrap();
        let mut store = ReadOnlyArchive(original);

        let mut bank = MessageBank::load_from(&store, "zel_00.bmg").unwrap();
        bank.set_text(1, "Changed");
        assert!(bank.save_to(&mut store, "zel_00.bmg", EncodeOptions::default()).is_err());
        assert!(bank.is_dirty());
        assert_eq!(store.get("zel_00.bmg").unwrap(), before);
    }

    #[test]
    fn test_failed_encode_leaves_store_untouched() {
        let mut store = archive_with_bank();
        let before = store.get("zel_00.bmg").unwrap();

        let mut bank = MessageBank::load_from(&store, "zel_00.bmg").unwrap();
        bank.set_text(1, "{not a tag");
        assert!(matches!(
            bank.save_to(&mut store, "zel_00.bmg", EncodeOptions::default()),
            Err(Error::InvalidEscapeTag { .. })
        ));
        assert_eq!(store.get("zel_00.bmg").unwrap(), before);
    }
}
