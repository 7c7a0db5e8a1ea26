//! kura-fs (倉): a filesystem convenience layer.
//!
//! Everything revolves around [`FsContext`], which holds a simulated
//! working directory and resolves every path against it:
//!
//! - **Resolution**: pure path resolution, a `.` shorthand for the current
//!   directory, and a single controlled `set_cwd` mutator
//! - **Entries**: stat queries, listings, create/delete/rename,
//!   last-modified stamping
//! - **Globbing**: one-level pattern matches with the hidden-file rule
//!   (compiled by `kura-glob`)
//! - **Trees**: lazy pre-order walking, recursive copy and delete
//! - **Permissions**: the `[u](+|-)[rwx]{1,3}` mode mini-language
//! - **Archives**: zip, tar, gzip and bzip2 extraction plus their packing
//!   duals
//!
//! All calls are synchronous and blocking; the context carries no locks,
//! so cross-thread sharing must be serialized by the caller.
//!
//! # Examples
//! ```no_run
//! use kura_fs::FsContext;
//!
//! let mut ctx = FsContext::new()?;
//! ctx.set_cwd("workspace")?;
//! for path in ctx.glob("*.tar")? {
//!     ctx.extract_tar(&path)?;
//! }
//! # Ok::<(), kura_fs::FsError>(())
//! ```

pub mod archive;
pub mod context;
pub mod error;
pub mod ops;
pub mod perms;
pub mod tree;

pub use context::FsContext;
pub use error::{FsError, FsResult};
pub use ops::EntryInfo;
pub use perms::Mode;

// Matcher and walker types, re-exported for consumers that work with walk
// records or compile patterns directly.
pub use kura_glob::{DirNode, DirWalker, Glob, PatternError, scan_dir};
