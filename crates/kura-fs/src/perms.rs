//! Permission changes and queries.
//!
//! Modes use a compact mini-language: an optional `u` scopes the change to
//! the owner, a mandatory `+` or `-` grants or revokes, and one to three of
//! `r`, `w`, `x` name the bits. `"+x"` grants execute to all three classes;
//! `"u-w"` revokes owner write without touching group or other write.

use std::fs;
use std::path::Path;

use crate::context::FsContext;
use crate::error::{FsError, FsResult};

/// A parsed permission change, matching `[u](+|-)[rwx]{1,3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    /// Restrict the change to the owner class.
    pub owner_only: bool,
    /// True grants the bits, false revokes them.
    pub grant: bool,
    pub read: bool,
    pub write: bool,
    pub exec: bool,
}

impl Mode {
    /// Parse a mode string; parsed once per call, never cached.
    ///
    /// # Examples
    /// ```
    /// use kura_fs::Mode;
    ///
    /// let mode = Mode::parse("u-w").unwrap();
    /// assert!(mode.owner_only);
    /// assert!(!mode.grant);
    /// assert!(mode.write);
    ///
    /// assert!(Mode::parse("rwx").is_err());
    /// ```
    pub fn parse(input: &str) -> FsResult<Self> {
        let mut chars = input.chars().peekable();

        let owner_only = chars.peek() == Some(&'u');
        if owner_only {
            chars.next();
        }

        let grant = match chars.next() {
            Some('+') => true,
            Some('-') => false,
            _ => return Err(FsError::InvalidMode(input.to_string())),
        };

        let (mut read, mut write, mut exec) = (false, false, false);
        let mut letters = 0;
        for c in chars {
            match c {
                'r' => read = true,
                'w' => write = true,
                'x' => exec = true,
                _ => return Err(FsError::InvalidMode(input.to_string())),
            }
            letters += 1;
        }
        if letters == 0 || letters > 3 {
            return Err(FsError::InvalidMode(input.to_string()));
        }

        Ok(Self {
            owner_only,
            grant,
            read,
            write,
            exec,
        })
    }

    /// The unix permission bits this mode touches.
    #[cfg(unix)]
    fn mask(&self) -> u32 {
        let mut mask = 0;
        if self.read {
            mask |= if self.owner_only { 0o400 } else { 0o444 };
        }
        if self.write {
            mask |= if self.owner_only { 0o200 } else { 0o222 };
        }
        if self.exec {
            mask |= if self.owner_only { 0o100 } else { 0o111 };
        }
        mask
    }
}

impl FsContext {
    /// Apply a permission change to an existing path.
    pub fn chmod(&self, mode: &str, path: impl AsRef<Path>) -> FsResult<()> {
        let mode = Mode::parse(mode)?;
        let resolved = self.require_exists(path)?;
        apply(&resolved, mode)
    }

    /// Check whether any read bit is set on the path.
    pub fn is_readable(&self, path: impl AsRef<Path>) -> bool {
        flag_query(&self.resolve(path), 0o444)
    }

    /// Check whether any write bit is set on the path.
    pub fn is_writable(&self, path: impl AsRef<Path>) -> bool {
        flag_query(&self.resolve(path), 0o222)
    }

    /// Check whether any execute bit is set on the path.
    pub fn is_executable(&self, path: impl AsRef<Path>) -> bool {
        flag_query(&self.resolve(path), 0o111)
    }
}

#[cfg(unix)]
fn apply(path: &Path, mode: Mode) -> FsResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut bits = fs::metadata(path)?.permissions().mode();
    if mode.grant {
        bits |= mode.mask();
    } else {
        bits &= !mode.mask();
    }
    fs::set_permissions(path, fs::Permissions::from_mode(bits))?;
    Ok(())
}

#[cfg(not(unix))]
fn apply(path: &Path, mode: Mode) -> FsResult<()> {
    // Only the write bit maps onto this platform; read and execute changes
    // are accepted but have nothing to flip.
    if mode.write {
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_readonly(!mode.grant);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(unix)]
fn flag_query(path: &Path, mask: u32) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & mask != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn flag_query(path: &Path, mask: u32) -> bool {
    match fs::metadata(path) {
        Ok(meta) => match mask {
            0o222 => !meta.permissions().readonly(),
            0o444 => true,
            _ => false,
        },
        Err(_) => false,
    }
}
