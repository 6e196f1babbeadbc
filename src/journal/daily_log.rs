use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use snafu::{ResultExt, Snafu};
use tracing::error;

use super::Journal;
use crate::ext::PathExt;

const FILE_NAME_DATE_FORMAT: &str = "%Y%m%d";
const LINE_TIME_FORMAT: &str = "%H:%M:%S";

/// Appends timestamped lines to one log file per calendar day and echoes
/// them to stdout.
#[derive(Debug, Clone)]
pub struct DailyLog {
    dir: PathBuf,
}

impl DailyLog {
    /// Checks that today's log file can be opened before anything else runs.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, JournalError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context(OpenSnafu { path: dir.clone() })?;

        let log = Self { dir };
        log.open_file(Local::now().date_naive())?;
        Ok(log)
    }

    pub fn file_path(&self, date: NaiveDate) -> PathBuf {
        log_file_path(&self.dir, date)
    }

    fn open_file(&self, date: NaiveDate) -> Result<File, JournalError> {
        let path = self.file_path(date);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context(OpenSnafu { path })
    }

    fn append(&self, line: &str) -> Result<(), JournalError> {
        let now = Local::now();
        let mut file = self.open_file(now.date_naive())?;
        writeln!(file, "{} {}", now.format(LINE_TIME_FORMAT), line).context(WriteSnafu {
            path: self.file_path(now.date_naive()),
        })
    }
}

impl Journal for DailyLog {
    fn record(&mut self, line: &str) {
        if let Err(e) = self.append(line) {
            error!("{e}");
        }
        println!("{line}");
    }
}

fn log_file_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.log", date.format(FILE_NAME_DATE_FORMAT)))
}

#[derive(Debug, Snafu)]
pub enum JournalError {
    #[snafu(display("Failed to open log file {}", path.best_effort_display()))]
    OpenError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write to log file {}", path.best_effort_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}
