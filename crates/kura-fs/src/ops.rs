//! Metadata queries and single-entry operations.

use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::context::FsContext;
use crate::error::FsResult;

/// Information about a file or directory entry.
#[derive(Debug, Clone)]
pub struct EntryInfo {
    /// Entry name (file or directory name).
    pub name: String,
    /// True if this is a directory.
    pub is_dir: bool,
    /// True if this is a regular file.
    pub is_file: bool,
    /// True if this is a symbolic link.
    pub is_symlink: bool,
    /// Size in bytes.
    pub size: u64,
    /// Last modification time (Unix timestamp in seconds).
    pub modified: Option<u64>,
    /// Unix permission bits; `None` on platforms without them.
    pub permissions: Option<u32>,
}

impl EntryInfo {
    /// Stat a path, following symlinks for the metadata.
    fn from_path(path: &Path) -> FsResult<Self> {
        let meta = fs::metadata(path)?;
        let is_symlink = fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            is_dir: meta.is_dir(),
            is_file: meta.is_file(),
            is_symlink,
            size: meta.len(),
            modified: modified_secs(&meta),
            permissions: unix_mode(&meta),
        })
    }

    /// Build from a directory entry without following symlinks.
    fn from_dir_entry(entry: &fs::DirEntry) -> FsResult<Self> {
        let meta = entry.metadata()?;
        let file_type = entry.file_type()?;
        Ok(Self {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: file_type.is_dir(),
            is_file: file_type.is_file(),
            is_symlink: file_type.is_symlink(),
            size: meta.len(),
            modified: modified_secs(&meta),
            permissions: unix_mode(&meta),
        })
    }
}

fn modified_secs(meta: &fs::Metadata) -> Option<u64> {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
}

#[cfg(unix)]
fn unix_mode(meta: &fs::Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode())
}

#[cfg(not(unix))]
fn unix_mode(_meta: &fs::Metadata) -> Option<u32> {
    None
}

impl FsContext {
    /// Check whether a path exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).exists()
    }

    /// Check whether a path is an existing directory.
    pub fn is_dir(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).is_dir()
    }

    /// Check whether a path is an existing regular file.
    pub fn is_file(&self, path: impl AsRef<Path>) -> bool {
        self.resolve(path).is_file()
    }

    /// Get metadata for a file or directory.
    pub fn stat(&self, path: impl AsRef<Path>) -> FsResult<EntryInfo> {
        EntryInfo::from_path(&self.resolve(path))
    }

    /// List the immediate children of a directory, name-sorted.
    pub fn list(&self, path: impl AsRef<Path>) -> FsResult<Vec<EntryInfo>> {
        let dir = self.resolve(path);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            entries.push(EntryInfo::from_dir_entry(&entry?)?);
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Create a directory and any missing parents. A no-op when the
    /// directory already exists.
    pub fn create_dir(&self, path: impl AsRef<Path>) -> FsResult<()> {
        Ok(fs::create_dir_all(self.resolve(path))?)
    }

    /// Create an empty file. Returns `false` rather than an error when an
    /// entry with that name already exists.
    pub fn create_file(&self, path: impl AsRef<Path>) -> FsResult<bool> {
        let resolved = self.resolve(path);
        match fs::File::options()
            .write(true)
            .create_new(true)
            .open(&resolved)
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a single entry: a file, a symlink, or an empty directory.
    pub fn delete(&self, path: impl AsRef<Path>) -> FsResult<()> {
        let resolved = self.resolve(path);
        let meta = fs::symlink_metadata(&resolved)?;
        if meta.is_dir() {
            fs::remove_dir(&resolved)?;
        } else {
            fs::remove_file(&resolved)?;
        }
        Ok(())
    }

    /// Rename (move) a file or directory. Same-filesystem only; no
    /// cross-device fallback.
    pub fn rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> FsResult<()> {
        Ok(fs::rename(self.resolve(from), self.resolve(to))?)
    }

    /// Set the last-modified time of an existing file.
    pub fn set_modified(&self, path: impl AsRef<Path>, time: SystemTime) -> FsResult<()> {
        let resolved = self.require_exists(path)?;
        let file = fs::File::options().write(true).open(&resolved)?;
        file.set_modified(time)?;
        Ok(())
    }
}
