//! Extracted-archive store backed by a directory on disk

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use walkdir::WalkDir;

use super::{ArchiveStore, normalize_path};
use crate::error::{Error, Result};

/// An archive that has been extracted to a directory
///
/// Logical paths are relative to the root. Writes go to a temporary file in
/// the target directory that is then renamed over the original, so a failed
/// write never leaves a half-written file behind.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    /// Open an extracted archive rooted at `root`.
    ///
    /// # Errors
    /// Returns [`Error::MissingFile`] if `root` is not a directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(Error::MissingFile {
                path: root.display().to_string(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let normalized = normalize_path(path)?;
        Ok(normalized
            .split('/')
            .fold(self.root.clone(), |acc, part| acc.join(part)))
    }
}

impl ArchiveStore for DirectoryArchive {
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let full = self.resolve(path)?;
        if !full.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read(full)?))
    }

    fn set(&mut self, path: &str, data: Vec<u8>) -> Result<()> {
        let full = self.resolve(path)?;
        let parent = full.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(&data)?;
        temp.flush()?;
        temp.persist(&full).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), full.display());
        Ok(())
    }

    fn paths(&self) -> Result<Vec<String>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                paths.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_directory_roundtrip() {
        let dir = tempdir().unwrap();
        let mut archive = DirectoryArchive::open(dir.path()).unwrap();

        assert!(archive.get("zel_00.bmg").unwrap().is_none());

        archive.set("zel_00.bmg", vec![1, 2, 3]).unwrap();
        archive.set("nested/dir/file.bin", vec![4]).unwrap();

        assert_eq!(archive.get("zel_00.bmg").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(archive.get("nested\\dir\\file.bin").unwrap(), Some(vec![4]));
        assert!(dir.path().join("nested").join("dir").join("file.bin").is_file());
        assert_eq!(
            archive.paths().unwrap(),
            vec!["nested/dir/file.bin", "zel_00.bmg"]
        );
    }

    #[test]
    fn test_open_missing_root() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            DirectoryArchive::open(dir.path().join("nope")),
            Err(Error::MissingFile { .. })
        ));
    }

    #[test]
    fn test_rejects_escaping_paths() {
        let dir = tempdir().unwrap();
        let mut archive = DirectoryArchive::open(dir.path()).unwrap();
        assert!(matches!(
            archive.set("../outside.bin", vec![0]),
            Err(Error::InvalidPath(_))
        ));
    }
}
