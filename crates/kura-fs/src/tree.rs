//! Whole-tree operations: walking, copying, deleting.

use std::fs;
use std::path::{Path, PathBuf};

use kura_glob::{DirWalker, scan_dir};

use crate::context::FsContext;
use crate::error::{FsError, FsResult};

impl FsContext {
    /// Walk a directory tree in pre-order, resolved against the context.
    ///
    /// The returned walker is lazy and forward-only; see [`DirWalker`].
    pub fn walk(&self, path: impl AsRef<Path>) -> DirWalker {
        DirWalker::new(self.resolve(path))
    }

    /// Recursively copy a directory tree.
    ///
    /// When `to` already exists as a directory, the copy nests one level
    /// inside it under `from`'s base name; otherwise `to` becomes the new
    /// root. Directories are created before the files they contain, and the
    /// relative structure is preserved. Returns the destination root.
    ///
    /// Entries already written stay on disk if a later entry fails; there
    /// is no rollback.
    pub fn copy_tree(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) -> FsResult<PathBuf> {
        let from = self.require_exists(from)?;
        if !from.is_dir() {
            return Err(FsError::NotDirectory(from.display().to_string()));
        }
        let to = self.resolve(to);

        let dest = if to.is_dir() {
            match from.file_name() {
                Some(base) => to.join(base),
                None => return Err(FsError::Io(format!(
                    "no base name to nest under: {}",
                    from.display()
                ))),
            }
        } else if to.exists() {
            return Err(FsError::DestinationIsFile(to.display().to_string()));
        } else {
            to
        };

        tracing::debug!("copy tree {} -> {}", from.display(), dest.display());
        fs::create_dir_all(&dest)?;
        for node in DirWalker::new(&from) {
            let Ok(rel) = node.dir.strip_prefix(&from) else {
                continue;
            };
            let target = dest.join(rel);
            for sub in &node.subdirs {
                fs::create_dir_all(target.join(sub))?;
            }
            for file in &node.files {
                fs::copy(node.dir.join(file), target.join(file))?;
            }
        }
        Ok(dest)
    }

    /// Recursively delete a directory tree, children before parents, then
    /// the root itself.
    ///
    /// Built on the walker's listing primitive rather than its lazy
    /// sequence; deletion must be exhaustive and ordered child-first.
    pub fn delete_tree(&self, path: impl AsRef<Path>) -> FsResult<()> {
        let root = self.require_exists(path)?;
        tracing::debug!("delete tree {}", root.display());
        delete_recursive(&root)
    }
}

fn delete_recursive(dir: &Path) -> FsResult<()> {
    if let Some(node) = scan_dir(dir) {
        for sub in &node.subdirs {
            delete_recursive(&node.dir.join(sub))?;
        }
        for file in &node.files {
            fs::remove_file(node.dir.join(file))?;
        }
        fs::remove_dir(dir)?;
    } else {
        // Not a listable directory: delete as a single entry.
        fs::remove_file(dir)?;
    }
    Ok(())
}
