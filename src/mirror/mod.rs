//! One-way mirroring of a source tree onto a target tree.
//!
//! Each directory level is listed on both sides, compared by name only, and
//! reconciled: extra target entries are removed, missing files are copied,
//! and every source subdirectory is visited in turn. File contents are never
//! compared.

mod copier;
mod deleter;
mod differ;
mod reconciler;
mod walker;

pub use copier::Copier;
pub use reconciler::{Reconciler, SyncTotals};
pub use walker::{DEFAULT_IGNORED, TreeWalker};
