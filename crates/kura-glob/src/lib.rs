//! kura-glob: Glob pattern compilation and directory tree walking.
//!
//! Provides:
//! - **Glob**: shell-style glob patterns compiled to anchored matchers,
//!   with `{a,b}` alternation, literal escaping, and the hidden-file rule
//!   (names starting with `.` only match dot-prefixed patterns)
//! - **DirWalker**: lazy pre-order walker yielding one [`DirNode`] per
//!   directory, with the subdirectory/file partition computed at visit time
//! - **scan_dir**: the single-directory listing primitive behind the walker
//!
//! Everything here is synchronous and talks directly to the platform
//! filesystem; higher-level operations (copying, deleting, archive handling)
//! live in `kura-fs`.

mod pattern;
mod walker;

pub use pattern::{Glob, PatternError};
pub use walker::{DirNode, DirWalker, scan_dir};
