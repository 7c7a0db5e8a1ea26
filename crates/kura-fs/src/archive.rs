//! Archive extraction and creation: zip, tar, gzip, bzip2.
//!
//! Extraction enumerates entries, skips directory entries, creates each
//! output file's parent directories, and stream-copies contents. Streams
//! are scoped to the call and released on success or failure; entries
//! already written stay on disk when a later entry fails.
//!
//! The default target for `extract_*` is the archive path with its final
//! extension stripped; `*_to` variants take an explicit destination.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use kura_glob::DirWalker;

use crate::context::FsContext;
use crate::error::FsResult;

impl FsContext {
    /// Extract a zip archive into the default target directory.
    pub fn extract_zip(&self, archive: impl AsRef<Path>) -> FsResult<PathBuf> {
        let dest = strip_extension(&self.resolve(&archive));
        self.extract_zip_to(&archive, &dest)?;
        Ok(dest)
    }

    /// Extract a zip archive into `dest`.
    ///
    /// Directory entries are skipped; their paths reappear through parent
    /// creation. Entries whose names escape `dest` are skipped.
    pub fn extract_zip_to(&self, archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> FsResult<()> {
        let archive = self.require_exists(archive)?;
        let dest = self.resolve(dest);

        let mut zip = zip::ZipArchive::new(fs::File::open(&archive)?)?;
        let mut extracted = 0usize;
        for index in 0..zip.len() {
            let mut entry = zip.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let Some(rel) = entry.enclosed_name() else {
                tracing::warn!("skipping zip entry outside destination: {}", entry.name());
                continue;
            };
            let out_path = dest.join(rel);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&out_path)?;
            io::copy(&mut entry, &mut out)?;
            extracted += 1;
        }
        tracing::debug!("extracted {} entries from {}", extracted, archive.display());
        Ok(())
    }

    /// Extract a tar archive into the default target directory.
    pub fn extract_tar(&self, archive: impl AsRef<Path>) -> FsResult<PathBuf> {
        let dest = strip_extension(&self.resolve(&archive));
        self.extract_tar_to(&archive, &dest)?;
        Ok(dest)
    }

    /// Extract a tar archive into `dest`, skipping non-file entries.
    pub fn extract_tar_to(&self, archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> FsResult<()> {
        let archive = self.require_exists(archive)?;
        let dest = self.resolve(dest);

        let mut tar = tar::Archive::new(fs::File::open(&archive)?);
        for entry in tar.entries()? {
            let mut entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let rel = entry.path()?.into_owned();
            let out_path = dest.join(rel);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = fs::File::create(&out_path)?;
            io::copy(&mut entry, &mut out)?;
        }
        Ok(())
    }

    /// Decompress a gzip stream into the default target (`.gz` stripped).
    pub fn extract_gzip(&self, archive: impl AsRef<Path>) -> FsResult<PathBuf> {
        let dest = strip_extension(&self.resolve(&archive));
        self.extract_gzip_to(&archive, &dest)?;
        Ok(dest)
    }

    /// Decompress a gzip stream into `dest`.
    pub fn extract_gzip_to(&self, archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> FsResult<()> {
        let archive = self.require_exists(archive)?;
        let dest = self.resolve(dest);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut decoder = flate2::read::GzDecoder::new(fs::File::open(&archive)?);
        let mut out = fs::File::create(&dest)?;
        io::copy(&mut decoder, &mut out)?;
        Ok(())
    }

    /// Decompress a bzip2 stream into the default target (`.bz2` stripped).
    pub fn extract_bzip2(&self, archive: impl AsRef<Path>) -> FsResult<PathBuf> {
        let dest = strip_extension(&self.resolve(&archive));
        self.extract_bzip2_to(&archive, &dest)?;
        Ok(dest)
    }

    /// Decompress a bzip2 stream into `dest`.
    pub fn extract_bzip2_to(&self, archive: impl AsRef<Path>, dest: impl AsRef<Path>) -> FsResult<()> {
        let archive = self.require_exists(archive)?;
        let dest = self.resolve(dest);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut decoder = bzip2::read::BzDecoder::new(fs::File::open(&archive)?);
        let mut out = fs::File::create(&dest)?;
        io::copy(&mut decoder, &mut out)?;
        Ok(())
    }

    /// Pack a directory tree into a zip archive.
    ///
    /// File entries are stored under their paths relative to `dir`;
    /// directories are implied by entry paths, so empty directories do not
    /// survive a round trip.
    pub fn create_zip(&self, dir: impl AsRef<Path>, archive: impl AsRef<Path>) -> FsResult<PathBuf> {
        let dir = self.require_exists(dir)?;
        let archive = self.resolve(archive);

        let mut zip = zip::ZipWriter::new(fs::File::create(&archive)?);
        let options = zip::write::SimpleFileOptions::default();
        for node in DirWalker::new(&dir) {
            let Ok(rel_dir) = node.dir.strip_prefix(&dir) else {
                continue;
            };
            for file in &node.files {
                zip.start_file(entry_name(&rel_dir.join(file)), options)?;
                let mut src = fs::File::open(node.dir.join(file))?;
                io::copy(&mut src, &mut zip)?;
            }
        }
        zip.finish()?;
        Ok(archive)
    }

    /// Pack a directory tree into a tar archive.
    pub fn create_tar(&self, dir: impl AsRef<Path>, archive: impl AsRef<Path>) -> FsResult<PathBuf> {
        let dir = self.require_exists(dir)?;
        let archive = self.resolve(archive);

        let mut builder = tar::Builder::new(fs::File::create(&archive)?);
        for node in DirWalker::new(&dir) {
            let Ok(rel_dir) = node.dir.strip_prefix(&dir) else {
                continue;
            };
            for file in &node.files {
                builder.append_path_with_name(node.dir.join(file), rel_dir.join(file))?;
            }
        }
        builder.finish()?;
        Ok(archive)
    }

    /// Compress a single file with gzip; the output appends `.gz`.
    pub fn compress_gzip(&self, file: impl AsRef<Path>) -> FsResult<PathBuf> {
        let dest = append_extension(&self.resolve(&file), "gz");
        self.compress_gzip_to(&file, &dest)?;
        Ok(dest)
    }

    /// Compress a single file with gzip into `dest`.
    pub fn compress_gzip_to(&self, file: impl AsRef<Path>, dest: impl AsRef<Path>) -> FsResult<()> {
        let file = self.require_exists(file)?;
        let dest = self.resolve(dest);
        let mut src = fs::File::open(&file)?;
        let mut encoder =
            flate2::write::GzEncoder::new(fs::File::create(&dest)?, flate2::Compression::default());
        io::copy(&mut src, &mut encoder)?;
        encoder.finish()?;
        Ok(())
    }

    /// Compress a single file with bzip2; the output appends `.bz2`.
    pub fn compress_bzip2(&self, file: impl AsRef<Path>) -> FsResult<PathBuf> {
        let dest = append_extension(&self.resolve(&file), "bz2");
        self.compress_bzip2_to(&file, &dest)?;
        Ok(dest)
    }

    /// Compress a single file with bzip2 into `dest`.
    pub fn compress_bzip2_to(&self, file: impl AsRef<Path>, dest: impl AsRef<Path>) -> FsResult<()> {
        let file = self.require_exists(file)?;
        let dest = self.resolve(dest);
        let mut src = fs::File::open(&file)?;
        let mut encoder =
            bzip2::write::BzEncoder::new(fs::File::create(&dest)?, bzip2::Compression::default());
        io::copy(&mut src, &mut encoder)?;
        encoder.finish()?;
        Ok(())
    }
}

/// The default extraction target: the archive path with its final
/// extension stripped (`data.zip` → `data`, `data.tar.gz` → `data.tar`).
fn strip_extension(path: &Path) -> PathBuf {
    path.with_extension("")
}

/// Append an extension without replacing the existing one.
fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".");
    os.push(ext);
    PathBuf::from(os)
}

/// Archive entry names always use forward slashes.
fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build `root/data/{a/x.txt, b/nested/y.txt, top.txt, empty/}`.
    fn make_source(root: &Path) -> PathBuf {
        let src = root.join("data");
        fs::create_dir_all(src.join("a")).unwrap();
        fs::create_dir_all(src.join("b/nested")).unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();
        fs::write(src.join("a/x.txt"), b"alpha contents").unwrap();
        fs::write(src.join("b/nested/y.txt"), b"nested contents").unwrap();
        fs::write(src.join("top.txt"), b"top level").unwrap();
        src
    }

    fn assert_mirrors_source(out: &Path) {
        assert_eq!(fs::read(out.join("a/x.txt")).unwrap(), b"alpha contents");
        assert_eq!(
            fs::read(out.join("b/nested/y.txt")).unwrap(),
            b"nested contents"
        );
        assert_eq!(fs::read(out.join("top.txt")).unwrap(), b"top level");
    }

    #[test]
    fn test_zip_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        make_source(temp.path());
        let ctx = FsContext::at(temp.path());

        let archive = ctx.create_zip("data", "data.zip").unwrap();
        assert!(archive.is_file());

        ctx.extract_zip_to("data.zip", "out").unwrap();
        assert_mirrors_source(&temp.path().join("out"));
    }

    #[test]
    fn test_zip_default_target_strips_extension() {
        let temp = tempfile::tempdir().unwrap();
        make_source(temp.path());
        let ctx = FsContext::at(temp.path());

        ctx.create_zip("data", "bundle.zip").unwrap();
        let dest = ctx.extract_zip("bundle.zip").unwrap();
        assert_eq!(dest, temp.path().join("bundle"));
        assert_mirrors_source(&dest);
    }

    #[test]
    fn test_tar_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        make_source(temp.path());
        let ctx = FsContext::at(temp.path());

        ctx.create_tar("data", "pack.tar").unwrap();
        let dest = ctx.extract_tar("pack.tar").unwrap();
        assert_eq!(dest, temp.path().join("pack"));
        assert_mirrors_source(&dest);
    }

    #[test]
    fn test_gzip_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("notes.txt"), b"gzip me please").unwrap();
        let ctx = FsContext::at(temp.path());

        let packed = ctx.compress_gzip("notes.txt").unwrap();
        assert_eq!(packed, temp.path().join("notes.txt.gz"));

        fs::remove_file(temp.path().join("notes.txt")).unwrap();
        let restored = ctx.extract_gzip("notes.txt.gz").unwrap();
        assert_eq!(restored, temp.path().join("notes.txt"));
        assert_eq!(fs::read(restored).unwrap(), b"gzip me please");
    }

    #[test]
    fn test_bzip2_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("notes.txt"), b"bzip2 me please").unwrap();
        let ctx = FsContext::at(temp.path());

        let packed = ctx.compress_bzip2("notes.txt").unwrap();
        assert_eq!(packed, temp.path().join("notes.txt.bz2"));

        fs::remove_file(temp.path().join("notes.txt")).unwrap();
        let restored = ctx.extract_bzip2("notes.txt.bz2").unwrap();
        assert_eq!(fs::read(restored).unwrap(), b"bzip2 me please");
    }

    #[test]
    fn test_empty_directories_do_not_round_trip() {
        let temp = tempfile::tempdir().unwrap();
        make_source(temp.path());
        let ctx = FsContext::at(temp.path());

        ctx.create_zip("data", "data.zip").unwrap();
        ctx.extract_zip_to("data.zip", "out").unwrap();
        assert!(!temp.path().join("out/empty").exists());
    }

    #[test]
    fn test_extract_missing_archive_fails() {
        let temp = tempfile::tempdir().unwrap();
        let ctx = FsContext::at(temp.path());
        assert!(ctx.extract_zip("ghost.zip").is_err());
        assert!(ctx.extract_tar("ghost.tar").is_err());
        assert!(ctx.extract_gzip("ghost.gz").is_err());
        assert!(ctx.extract_bzip2("ghost.bz2").is_err());
    }

    #[test]
    fn test_compressed_tar_chain() {
        // tar + gzip compose: data.tar -> data.tar.gz -> data.tar -> out/
        let temp = tempfile::tempdir().unwrap();
        make_source(temp.path());
        let ctx = FsContext::at(temp.path());

        ctx.create_tar("data", "data.tar").unwrap();
        ctx.compress_gzip("data.tar").unwrap();
        fs::remove_file(temp.path().join("data.tar")).unwrap();

        let tar_again = ctx.extract_gzip("data.tar.gz").unwrap();
        assert_eq!(tar_again, temp.path().join("data.tar"));
        ctx.extract_tar_to("data.tar", "out").unwrap();
        assert_mirrors_source(&temp.path().join("out"));
    }
}
