use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use derive_more::{Add, AddAssign};
use tracing::{debug, info, warn};

use super::copier::Copier;
use super::deleter::delete_entries;
use super::differ::diff;
use super::walker::{Listing, TreeWalker};
use crate::ext::PathExt;
use crate::journal::{Journal, format_elapsed};

/// Files added and deleted, summed over a level and everything below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Add, AddAssign)]
pub struct SyncTotals {
    pub added: usize,
    pub deleted: usize,
}

impl SyncTotals {
    pub fn new(added: usize, deleted: usize) -> Self {
        Self { added, deleted }
    }
}

/// Where the recursion currently is.
#[derive(Debug, Clone)]
pub struct SyncLevel {
    pub source: PathBuf,
    pub target: PathBuf,
    pub depth: usize,
}

impl SyncLevel {
    pub fn root(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            depth: 0,
        }
    }

    fn child(&self, name: &OsStr) -> Self {
        Self {
            source: self.source.join(name),
            target: self.target.join(name),
            depth: self.depth + 1,
        }
    }
}

/// The progress line written after a level's own work is done.
#[derive(Debug, Clone)]
pub struct LevelReport {
    pub name: String,
    pub depth: usize,
    pub files_added: usize,
    pub files_deleted: usize,
    pub dirs_deleted: usize,
    pub elapsed: Duration,
}

impl fmt::Display for LevelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.depth > 0 {
            write!(f, "{} ", "-".repeat(self.depth * 4))?;
        }
        write!(
            f,
            "{} add: {}, del: {} files, {} dirs, takes {} .",
            self.name,
            self.files_added,
            self.files_deleted,
            self.dirs_deleted,
            format_elapsed(self.elapsed)
        )
    }
}

/// Makes a target tree hold the same names as a source tree, one directory
/// level at a time.
pub struct Reconciler<'j, J: Journal> {
    walker: TreeWalker,
    copier: Copier,
    journal: &'j mut J,
}

impl<'j, J: Journal> Reconciler<'j, J> {
    pub fn new(walker: TreeWalker, copier: Copier, journal: &'j mut J) -> Self {
        Self {
            walker,
            copier,
            journal,
        }
    }

    /// Mirrors `source` onto `target` and returns the run-wide totals.
    pub fn run(&mut self, source: &Path, target: &Path) -> SyncTotals {
        info!(
            "Mirroring {} onto {}",
            source.best_effort_display(),
            target.best_effort_display()
        );
        self.reconcile(&SyncLevel::root(source, target))
    }

    /// Syncs one level, then descends into every directory the source has.
    pub fn reconcile(&mut self, level: &SyncLevel) -> SyncTotals {
        let start = Instant::now();

        let Some(source_listing) = self.source_listing(&level.source) else {
            return SyncTotals::default();
        };

        if level.depth > 0 && !self.unlink_symlinked_target(&level.target) {
            return SyncTotals::default();
        }

        if let Err(e) = fs::create_dir_all(&level.target) {
            self.journal.record(&format!(
                "cannot create target directory {}: {e}",
                level.target.display()
            ));
            return SyncTotals::default();
        }

        let target_listing = self.walker.list(&level.target).unwrap_or_else(|e| {
            self.journal.record(&format!("{e}: treating it as empty"));
            Listing::default()
        });

        let files = diff(source_listing.file_names(), target_listing.file_names());
        let directories = diff(
            source_listing.directory_names(),
            target_listing.directory_names(),
        );

        if files.is_empty()
            && directories.deleted.is_empty()
            && target_listing.others.is_empty()
        {
            debug!("{} already matches its source", level.target.display());
        }

        // Removals go first so a name that changed kind can be recreated.
        // Links and other special entries in the target are never mirrored.
        let specials: Vec<OsString> = target_listing
            .other_names()
            .map(OsStr::to_os_string)
            .collect();
        let specials_deleted = delete_entries(&specials, &level.target, &mut *self.journal);
        let dirs_deleted =
            delete_entries(&directories.deleted, &level.target, &mut *self.journal);
        let files_deleted = specials_deleted
            + delete_entries(&files.deleted, &level.target, &mut *self.journal);
        let files_added = self.copier.copy_files(
            &files.added,
            &level.source,
            &level.target,
            &mut *self.journal,
        );

        let report = LevelReport {
            name: level.target.base_name().into_owned(),
            depth: level.depth,
            files_added,
            files_deleted,
            dirs_deleted,
            elapsed: start.elapsed(),
        };
        self.journal.record(&report.to_string());

        let mut totals = SyncTotals::new(files_added, files_deleted);
        for name in source_listing.directory_names() {
            totals += self.reconcile(&level.child(name));
        }
        totals
    }

    /// Removes a symlink sitting where a target subdirectory belongs, so the
    /// level never mirrors into the link's destination. Returns `false` when
    /// the level has to be skipped.
    fn unlink_symlinked_target(&mut self, target: &Path) -> bool {
        let is_symlink =
            fs::symlink_metadata(target).is_ok_and(|meta| meta.file_type().is_symlink());
        if !is_symlink {
            return true;
        }

        debug!("Removing symlink at {}", target.display());
        match fs::remove_file(target) {
            Ok(()) => true,
            Err(e) => {
                self.journal.record(&format!(
                    "cannot remove symlink {}: {e}, skipping",
                    target.display()
                ));
                false
            }
        }
    }

    /// Lists the source side, or `None` when the level has to be skipped.
    ///
    /// A missing or unreadable source never leads to deleting anything on the
    /// target side.
    fn source_listing(&mut self, source: &Path) -> Option<Listing> {
        if !source.exists() {
            warn!("Source {} does not exist, skipping", source.display());
            self.journal.record(&format!(
                "source {} does not exist, skipping",
                source.display()
            ));
            return None;
        }

        match self.walker.list(source) {
            Ok(listing) => {
                debug!(
                    "Source {} has {} files and {} directories",
                    source.display(),
                    listing.files.len(),
                    listing.directories.len()
                );
                Some(listing)
            }
            Err(e) => {
                self.journal.record(&format!("{e}: skipping"));
                None
            }
        }
    }
}
