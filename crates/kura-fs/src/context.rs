//! The filesystem context: a simulated working directory and path
//! resolution against it.

use std::env;
use std::iter;
use std::path::{Path, PathBuf};

use kura_glob::{Glob, scan_dir};

use crate::error::{FsError, FsResult};

/// Filesystem context holding the simulated current directory.
///
/// The context replaces hidden process-global state: every path-resolving
/// operation takes the context, and [`FsContext::set_cwd`] is the single
/// controlled mutator. Resolution itself is pure: a function of the stored
/// directory and the input, with no filesystem access.
///
/// The context is a plain value with no interior synchronization. Mutating
/// the working directory while other threads resolve paths through the same
/// context is a race; callers needing that must serialize externally.
pub struct FsContext {
    cwd: PathBuf,
}

impl FsContext {
    /// Create a context rooted at the process's real working directory.
    pub fn new() -> FsResult<Self> {
        Ok(Self {
            cwd: env::current_dir()?,
        })
    }

    /// Create a context rooted at an explicit directory.
    ///
    /// The path is taken as-is; intended for tests and embedders that
    /// manage their own roots.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { cwd: dir.into() }
    }

    /// The current simulated working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a path against the current directory.
    ///
    /// `.` means the current directory itself; absolute paths come back
    /// unchanged; relative paths are joined onto the current directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.resolve_with(path, iter::empty::<&Path>())
    }

    /// Resolve a path with extra segments joined on first.
    ///
    /// Segments are joined with the platform join rule, as one single join
    /// without element-by-element normalization, so an absolute segment
    /// replaces everything before it.
    pub fn resolve_with<I, P>(&self, path: impl AsRef<Path>, extra: I) -> PathBuf
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut joined = if path == Path::new(".") {
            self.cwd.clone()
        } else {
            path.to_path_buf()
        };
        for segment in extra {
            joined.push(segment);
        }
        if joined.is_absolute() {
            joined
        } else {
            self.cwd.join(joined)
        }
    }

    /// Resolve a path and require that it exists.
    ///
    /// Resolution never checks the filesystem; operations that need an
    /// existing target (tree copies, chmod, archive reads) call this first.
    pub fn require_exists(&self, path: impl AsRef<Path>) -> FsResult<PathBuf> {
        let resolved = self.resolve(path);
        if resolved.exists() {
            Ok(resolved)
        } else {
            Err(FsError::NotFound(resolved.display().to_string()))
        }
    }

    /// Change the simulated working directory.
    ///
    /// The target is resolved against the current directory and must be an
    /// existing directory.
    pub fn set_cwd(&mut self, path: impl AsRef<Path>) -> FsResult<()> {
        let resolved = self.require_exists(path)?;
        if !resolved.is_dir() {
            return Err(FsError::NotDirectory(resolved.display().to_string()));
        }
        self.cwd = resolved;
        Ok(())
    }

    /// Match a glob pattern against one directory level.
    ///
    /// A pattern without a separator searches the current directory;
    /// otherwise the leading components name the directory to search and
    /// the final component is compiled as the matcher. Returns the matching
    /// entries as full paths, name-sorted. The search is a single level,
    /// never recursive; a missing search root yields an empty set.
    ///
    /// # Examples
    /// ```no_run
    /// use kura_fs::FsContext;
    ///
    /// let ctx = FsContext::new().unwrap();
    /// for path in ctx.glob("src/*.rs").unwrap() {
    ///     println!("{}", path.display());
    /// }
    /// ```
    pub fn glob(&self, pattern: &str) -> FsResult<Vec<PathBuf>> {
        let (root, leaf) = match pattern.rsplit_once('/') {
            Some(("", leaf)) => (PathBuf::from("/"), leaf),
            Some((dir, leaf)) => (self.resolve(dir), leaf),
            None => (self.cwd.clone(), pattern),
        };
        let glob = Glob::new(leaf)?;

        let Some(node) = scan_dir(&root) else {
            return Ok(Vec::new());
        };
        let mut matched: Vec<PathBuf> = node
            .subdirs
            .iter()
            .chain(node.files.iter())
            .filter(|name| glob.matches(name))
            .map(|name| root.join(name))
            .collect();
        matched.sort();
        Ok(matched)
    }
}
