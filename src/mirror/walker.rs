use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use derive_more::Display;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::PathExt;

/// Names skipped when no ignore list is configured.
pub const DEFAULT_IGNORED: &[&str] = &[".DS_Store"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("directory")]
    Directory,
    /// Symlinks, sockets, devices and anything else that is neither.
    #[display("special entry")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: OsString,
    pub kind: EntryKind,
}

/// Immediate children of one directory, split by kind.
///
/// Only `files` and `directories` take part in mirroring. `others` is kept so
/// the target side can get rid of links that would otherwise be written or
/// descended through.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub files: Vec<DirectoryEntry>,
    pub directories: Vec<DirectoryEntry>,
    pub others: Vec<DirectoryEntry>,
}

impl Listing {
    fn push(&mut self, entry: DirectoryEntry) {
        match entry.kind {
            EntryKind::File => self.files.push(entry),
            EntryKind::Directory => self.directories.push(entry),
            EntryKind::Other => self.others.push(entry),
        }
    }

    pub fn file_names(&self) -> impl Iterator<Item = &OsStr> {
        self.files.iter().map(|entry| entry.name.as_os_str())
    }

    pub fn directory_names(&self) -> impl Iterator<Item = &OsStr> {
        self.directories.iter().map(|entry| entry.name.as_os_str())
    }

    pub fn other_names(&self) -> impl Iterator<Item = &OsStr> {
        self.others.iter().map(|entry| entry.name.as_os_str())
    }
}

/// Lists directories one level at a time, hiding ignored names.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    ignored: HashSet<OsString>,
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED.iter().copied())
    }
}

impl TreeWalker {
    pub fn new<I, S>(ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            ignored: ignored.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_ignored(&self, name: &OsStr) -> bool {
        self.ignored.contains(name)
    }

    /// Lists the entries directly under `dir`.
    ///
    /// The entry type is read without following links, so symlinks, sockets
    /// and devices never show up as files or directories.
    pub fn list(&self, dir: &Path) -> Result<Listing, WalkError> {
        let read_dir = fs::read_dir(dir).context(OpenDirSnafu {
            path: dir.to_path_buf(),
        })?;

        let mut listing = Listing::default();
        for entry in read_dir {
            let entry = entry.context(ReadEntrySnafu {
                path: dir.to_path_buf(),
            })?;
            let file_type = entry.file_type().context(ReadEntrySnafu {
                path: entry.path(),
            })?;

            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };

            let name = entry.file_name();
            if self.is_ignored(&name) {
                debug!("Ignoring {} {}", kind, entry.path().display());
                continue;
            }

            listing.push(DirectoryEntry { name, kind });
        }

        debug!(
            "Listed {}: {} files, {} directories, {} special",
            dir.best_effort_display(),
            listing.files.len(),
            listing.directories.len(),
            listing.others.len()
        );
        Ok(listing)
    }
}

#[derive(Debug, Snafu)]
pub enum WalkError {
    #[snafu(display("Failed to open directory {}", path.best_effort_display()))]
    OpenDirError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read entries of {}", path.best_effort_display()))]
    ReadEntryError {
        path: PathBuf,
        source: std::io::Error,
    },
}
