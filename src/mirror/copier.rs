use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::{debug, warn};

use crate::ext::PathExt;
use crate::journal::Journal;

/// Size of the transfer buffer shared by one batch of copies.
pub const DEFAULT_BUFFER_SIZE: usize = 20 * 1024 * 1024;

/// Streams files from a source directory into a target directory through a
/// fixed-size buffer.
#[derive(Debug, Clone)]
pub struct Copier {
    buffer_size: usize,
}

impl Default for Copier {
    fn default() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }
}

impl Copier {
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Copies every named file from `source_dir` to `target_dir`, replacing
    /// whatever sits at the destination.
    ///
    /// A failing file is recorded and skipped; the rest of the batch still
    /// runs. Returns how many files were copied completely.
    pub fn copy_files(
        &self,
        names: &[OsString],
        source_dir: &Path,
        target_dir: &Path,
        journal: &mut impl Journal,
    ) -> usize {
        if names.is_empty() {
            return 0;
        }

        let mut buffer = vec![0u8; self.buffer_size];
        let mut copied = 0;

        for name in names {
            let source = source_dir.join(name);
            let target = target_dir.join(name);

            match copy_file(&source, &target, &mut buffer) {
                Ok(bytes) => {
                    debug!(
                        "Copied {} -> {} ({bytes} bytes)",
                        source.display(),
                        target.display()
                    );
                    copied += 1;
                }
                Err(e) => {
                    journal.record(&format!("copy failed: {e}: {}", e.io_error()));
                    if e.left_partial_file() {
                        discard_partial(&target);
                    }
                }
            }
        }

        copied
    }
}

/// Copies one file; both handles are closed when this returns.
///
/// A symlink at the destination is replaced, never written through.
fn copy_file(source: &Path, target: &Path, buffer: &mut [u8]) -> Result<u64, CopyError> {
    let mut reader = File::open(source).context(OpenSourceSnafu { path: source })?;
    if fs::symlink_metadata(target).is_ok_and(|meta| meta.file_type().is_symlink()) {
        debug!("Replacing symlink at {}", target.display());
        fs::remove_file(target).context(CreateTargetSnafu { path: target })?;
    }
    let mut writer = File::create(target).context(CreateTargetSnafu { path: target })?;

    let mut total = 0u64;
    loop {
        let n = match reader.read(buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context(ReadSnafu { path: source }),
        };
        writer
            .write_all(&buffer[..n])
            .context(WriteSnafu { path: target })?;
        total += n as u64;
    }

    writer.flush().context(WriteSnafu { path: target })?;
    Ok(total)
}

/// Removes what a failed copy left behind, as long as it is a regular file.
fn discard_partial(target: &Path) {
    if !fs::symlink_metadata(target).is_ok_and(|meta| meta.is_file()) {
        return;
    }
    if let Err(e) = fs::remove_file(target) {
        warn!(
            "Could not remove partially copied {}: {e}",
            target.best_effort_display()
        );
    }
}

#[derive(Debug, Snafu)]
pub enum CopyError {
    #[snafu(display("cannot open source {}", path.display()))]
    OpenSourceError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("cannot create destination {}", path.display()))]
    CreateTargetError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("read error in {}", path.display()))]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("write error in {}", path.display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CopyError {
    fn io_error(&self) -> &std::io::Error {
        match self {
            CopyError::OpenSourceError { source, .. }
            | CopyError::CreateTargetError { source, .. }
            | CopyError::ReadError { source, .. }
            | CopyError::WriteError { source, .. } => source,
        }
    }

    /// Read and write failures happen after the destination was created.
    fn left_partial_file(&self) -> bool {
        matches!(self, CopyError::ReadError { .. } | CopyError::WriteError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::MemoryJournal;
    use tempfile::TempDir;

    fn names(raw: &[&str]) -> Vec<OsString> {
        raw.iter().map(OsString::from).collect()
    }

    #[test]
    fn copies_contents_across_several_buffer_fills() {
        let source = TempDir::new().expect("Failed to create source dir");
        let target = TempDir::new().expect("Failed to create target dir");
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(source.path().join("big.bin"), &payload).unwrap();
        fs::write(source.path().join("empty.txt"), "").unwrap();

        let mut journal = MemoryJournal::default();
        let copied = Copier::with_buffer_size(64).copy_files(
            &names(&["big.bin", "empty.txt"]),
            source.path(),
            target.path(),
            &mut journal,
        );

        assert_eq!(copied, 2);
        assert_eq!(fs::read(target.path().join("big.bin")).unwrap(), payload);
        assert_eq!(fs::read(target.path().join("empty.txt")).unwrap(), b"");
        assert!(journal.lines.is_empty());
    }

    #[test]
    fn existing_destination_is_truncated() {
        let source = TempDir::new().expect("Failed to create source dir");
        let target = TempDir::new().expect("Failed to create target dir");
        fs::write(source.path().join("f.txt"), "new").unwrap();
        fs::write(target.path().join("f.txt"), "much longer old content").unwrap();

        let copied = Copier::default().copy_files(
            &names(&["f.txt"]),
            source.path(),
            target.path(),
            &mut MemoryJournal::default(),
        );

        assert_eq!(copied, 1);
        assert_eq!(
            fs::read_to_string(target.path().join("f.txt")).unwrap(),
            "new"
        );
    }

    #[test]
    fn missing_source_skips_only_that_file() {
        let source = TempDir::new().expect("Failed to create source dir");
        let target = TempDir::new().expect("Failed to create target dir");
        fs::write(source.path().join("first.txt"), "1").unwrap();
        fs::write(source.path().join("last.txt"), "3").unwrap();

        let mut journal = MemoryJournal::default();
        let copied = Copier::default().copy_files(
            &names(&["first.txt", "vanished.txt", "last.txt"]),
            source.path(),
            target.path(),
            &mut journal,
        );

        assert_eq!(copied, 2);
        assert!(target.path().join("first.txt").is_file());
        assert!(target.path().join("last.txt").is_file());
        assert!(!target.path().join("vanished.txt").exists());
        assert_eq!(journal.lines.len(), 1);
        assert!(journal.contains("cannot open source"));
    }

    #[test]
    fn uncreatable_destination_is_recorded() {
        let source = TempDir::new().expect("Failed to create source dir");
        let target = TempDir::new().expect("Failed to create target dir");
        fs::write(source.path().join("f.txt"), "x").unwrap();

        let mut journal = MemoryJournal::default();
        let copied = Copier::default().copy_files(
            &names(&["f.txt"]),
            source.path(),
            &target.path().join("missing_dir"),
            &mut journal,
        );

        assert_eq!(copied, 0);
        assert!(journal.contains("cannot create destination"));
    }

    #[test]
    fn read_error_leaves_no_partial_file_and_batch_continues() {
        let source = TempDir::new().expect("Failed to create source dir");
        let target = TempDir::new().expect("Failed to create target dir");
        fs::create_dir(source.path().join("not_a_file")).unwrap();
        fs::write(source.path().join("ok.txt"), "fine").unwrap();

        let mut journal = MemoryJournal::default();
        let copied = Copier::default().copy_files(
            &names(&["not_a_file", "ok.txt"]),
            source.path(),
            target.path(),
            &mut journal,
        );

        assert_eq!(copied, 1);
        assert_eq!(journal.lines.len(), 1);
        assert!(journal.contains("read error"));
        assert!(!target.path().join("not_a_file").exists());
        assert_eq!(
            fs::read_to_string(target.path().join("ok.txt")).unwrap(),
            "fine"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_error_is_recorded_and_device_is_kept() {
        let dev_full = Path::new("/dev/full");
        if !dev_full.exists() {
            return;
        }
        let source = TempDir::new().expect("Failed to create source dir");
        fs::write(source.path().join("full"), "no room for this").unwrap();

        let mut journal = MemoryJournal::default();
        let copied = Copier::with_buffer_size(4).copy_files(
            &names(&["full"]),
            source.path(),
            Path::new("/dev"),
            &mut journal,
        );

        assert_eq!(copied, 0);
        assert_eq!(journal.lines.len(), 1);
        assert!(journal.contains("write error"));
        assert!(dev_full.exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_destination_is_replaced_not_written_through() {
        let source = TempDir::new().expect("Failed to create source dir");
        let target = TempDir::new().expect("Failed to create target dir");
        let outside = TempDir::new().expect("Failed to create outside dir");
        fs::write(source.path().join("f.txt"), "mirrored").unwrap();
        fs::write(outside.path().join("elsewhere.txt"), "untouched").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("elsewhere.txt"),
            target.path().join("f.txt"),
        )
        .unwrap();

        let copied = Copier::default().copy_files(
            &names(&["f.txt"]),
            source.path(),
            target.path(),
            &mut MemoryJournal::default(),
        );

        assert_eq!(copied, 1);
        let landed = target.path().join("f.txt");
        assert!(fs::symlink_metadata(&landed).unwrap().is_file());
        assert_eq!(fs::read_to_string(landed).unwrap(), "mirrored");
        assert_eq!(
            fs::read_to_string(outside.path().join("elsewhere.txt")).unwrap(),
            "untouched"
        );
    }

    #[test]
    fn empty_batch_copies_nothing() {
        let dir = TempDir::new().expect("Failed to create dir");
        let copied =
            Copier::default().copy_files(&[], dir.path(), dir.path(), &mut MemoryJournal::default());
        assert_eq!(copied, 0);
    }
}
