//! In-memory archive store

use indexmap::IndexMap;

use super::{ArchiveStore, normalize_path};
use crate::error::Result;

/// Archive files held in memory, in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    files: IndexMap<String, Vec<u8>>,
}

impl MemoryArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any existing file at the same path.
    pub fn insert(&mut self, path: &str, data: Vec<u8>) -> Result<()> {
        self.files.insert(normalize_path(path)?, data);
        Ok(())
    }

    /// Borrow a file's bytes without copying.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&[u8]> {
        let path = normalize_path(path).ok()?;
        self.files.get(&path).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ArchiveStore for MemoryArchive {
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let path = normalize_path(path)?;
        Ok(self.files.get(&path).cloned())
    }

    fn set(&mut self, path: &str, data: Vec<u8>) -> Result<()> {
        self.insert(path, data)
    }

    fn paths(&self) -> Result<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut archive = MemoryArchive::new();
        archive.set("/zel_00.bmg", vec![1, 2, 3]).unwrap();
        archive.set("other.bin", vec![4]).unwrap();

        assert_eq!(archive.get("zel_00.bmg").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(archive.file("\\zel_00.bmg"), Some(&[1u8, 2, 3][..]));
        assert!(archive.get("missing").unwrap().is_none());
        assert!(archive.contains("other.bin").unwrap());
        assert_eq!(archive.paths().unwrap(), vec!["zel_00.bmg", "other.bin"]);

        archive.set("zel_00.bmg", vec![9]).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.get("zel_00.bmg").unwrap(), Some(vec![9]));
    }
}
