use std::ffi::{OsStr, OsString};

use hashlink::LinkedHashMap;

/// Which side of the comparison a name was seen on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Added,
    Unchanged,
    Deleted,
}

/// Names to copy (`added`) and to remove (`deleted`) for one level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub added: Vec<OsString>,
    pub deleted: Vec<OsString>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }
}

/// Compares two name sets by exact, case-sensitive name.
///
/// Output keeps source order for `added` and target order for `deleted`.
pub fn diff<'a, S, T>(source: S, target: T) -> DiffResult
where
    S: IntoIterator<Item = &'a OsStr>,
    T: IntoIterator<Item = &'a OsStr>,
{
    let mut presence: LinkedHashMap<&OsStr, Presence> = source
        .into_iter()
        .map(|name| (name, Presence::Added))
        .collect();

    for name in target {
        match presence.get_mut(name) {
            Some(state) => *state = Presence::Unchanged,
            None => {
                presence.insert(name, Presence::Deleted);
            }
        }
    }

    let mut result = DiffResult::default();
    for (name, state) in presence {
        match state {
            Presence::Added => result.added.push(name.to_os_string()),
            Presence::Deleted => result.deleted.push(name.to_os_string()),
            Presence::Unchanged => {}
        }
    }
    result
}
