use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::journal::Journal;

/// Removes each named entry under `target_dir`, whole subtrees included.
///
/// Every name is attempted on its own; failures are recorded and do not stop
/// the rest of the list. An entry that is already gone counts as removed.
pub fn delete_entries(names: &[OsString], target_dir: &Path, journal: &mut impl Journal) -> usize {
    let mut removed = 0;

    for name in names {
        let path = target_dir.join(name);
        match remove_all(&path) {
            Ok(()) => {
                debug!("Removed {}", path.display());
                removed += 1;
            }
            Err(e) => journal.record(&format!("delete failed: {}: {e}", path.display())),
        }
    }

    removed
}

fn remove_all(path: &Path) -> std::io::Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
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
    fn removes_files_and_whole_subtrees() {
        let target = TempDir::new().expect("Failed to create target dir");
        fs::write(target.path().join("stale.txt"), "s").unwrap();
        fs::create_dir_all(target.path().join("old/deeper/deepest")).unwrap();
        fs::write(target.path().join("old/a.txt"), "a").unwrap();
        fs::write(target.path().join("old/deeper/deepest/b.txt"), "b").unwrap();
        fs::write(target.path().join("kept.txt"), "k").unwrap();

        let mut journal = MemoryJournal::default();
        let removed = delete_entries(&names(&["stale.txt", "old"]), target.path(), &mut journal);

        assert_eq!(removed, 2);
        assert!(!target.path().join("stale.txt").exists());
        assert!(!target.path().join("old").exists());
        assert!(target.path().join("kept.txt").is_file());
        assert!(journal.lines.is_empty());
    }

    #[test]
    fn already_missing_entry_counts_as_removed() {
        let target = TempDir::new().expect("Failed to create target dir");

        let removed = delete_entries(
            &names(&["ghost"]),
            target.path(),
            &mut MemoryJournal::default(),
        );

        assert_eq!(removed, 1);
    }

    #[cfg(unix)]
    #[test]
    fn one_failure_does_not_stop_the_rest() {
        use std::os::unix::fs::PermissionsExt;

        let target = TempDir::new().expect("Failed to create target dir");
        let locked = target.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("inner.txt"), "i").unwrap();
        fs::write(target.path().join("free.txt"), "f").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o500)).unwrap();

        // Root ignores directory permissions, so the failure cannot be staged.
        let can_stage_failure = fs::File::create(locked.join("probe")).is_err();

        let mut journal = MemoryJournal::default();
        let removed = delete_entries(&names(&["locked", "free.txt"]), target.path(), &mut journal);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();

        assert!(!target.path().join("free.txt").exists());
        if can_stage_failure {
            assert_eq!(removed, 1);
            assert!(journal.contains("delete failed"));
        } else {
            assert_eq!(removed, 2);
        }
    }
}
