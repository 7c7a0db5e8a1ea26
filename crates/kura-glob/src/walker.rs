//! Lazy pre-order directory tree walking.
//!
//! `DirWalker` yields one [`DirNode`] per directory, parent before children,
//! driven by an explicit work-stack of pending directories. Consumers can
//! stop early without the walker materializing the rest of the tree.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// One visited directory: its path plus the names of its immediate
/// children, partitioned into subdirectories and everything else.
///
/// Name sets are ordered so traversal and listings are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    /// The directory this record describes.
    pub dir: PathBuf,
    /// Names of immediate subdirectories.
    pub subdirs: BTreeSet<String>,
    /// Names of immediate non-directory entries.
    pub files: BTreeSet<String>,
}

/// List a single directory into a [`DirNode`].
///
/// Returns `None` when `dir` does not exist or cannot be listed. Symbolic
/// links are classified without following them, so a symlinked directory
/// lands in `files` and is never recursed into. Entries whose type cannot
/// be determined are treated as files; non-UTF-8 names are skipped.
pub fn scan_dir(dir: &Path) -> Option<DirNode> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = BTreeSet::new();
    let mut files = BTreeSet::new();
    for entry in entries.flatten() {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir {
            subdirs.insert(name);
        } else {
            files.insert(name);
        }
    }
    Some(DirNode {
        dir: dir.to_path_buf(),
        subdirs,
        files,
    })
}

/// Lazy pre-order walker over a directory tree.
///
/// The root is visited first; every directory reachable through subdirectory
/// links is visited exactly once, with the subdirectory/file partition
/// computed at the moment of visiting. The sequence is forward-only and not
/// restartable; call [`DirWalker::new`] again to walk again.
///
/// A missing or non-directory root produces an empty sequence rather than
/// an error; directories that become unreadable mid-walk are skipped.
///
/// # Examples
/// ```no_run
/// use kura_glob::DirWalker;
///
/// for node in DirWalker::new("src") {
///     println!("{}: {} dirs, {} files",
///         node.dir.display(), node.subdirs.len(), node.files.len());
/// }
/// ```
#[derive(Debug)]
pub struct DirWalker {
    stack: Vec<PathBuf>,
}

impl DirWalker {
    /// Start a walk rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            stack: vec![root.as_ref().to_path_buf()],
        }
    }
}

impl Iterator for DirWalker {
    type Item = DirNode;

    fn next(&mut self) -> Option<DirNode> {
        while let Some(dir) = self.stack.pop() {
            let Some(node) = scan_dir(&dir) else {
                continue;
            };
            // Push in reverse so alphabetically-first subdirectories are
            // popped first from the LIFO stack.
            for name in node.subdirs.iter().rev() {
                self.stack.push(node.dir.join(name));
            }
            return Some(node);
        }
        None
    }
}
