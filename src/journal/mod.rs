//! Operator-facing run log.
//!
//! Every line the run produces for the operator (progress per directory
//! level, per-entry problems and the final summary) goes through a
//! [`Journal`], which is handed to whoever needs it instead of living in a
//! global.

mod daily_log;
mod elapsed;
#[cfg(test)]
mod memory_journal;

pub use daily_log::{DailyLog, JournalError};
pub use elapsed::format_elapsed;
#[cfg(test)]
pub use memory_journal::MemoryJournal;

pub trait Journal {
    fn record(&mut self, line: &str);
}

