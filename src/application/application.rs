use std::io::{self, BufRead, Write};
use std::time::Instant;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::{RuntimeConfig, confirm};
use crate::config::{Settings, SettingsError};
use crate::journal::{DailyLog, Journal, JournalError, format_elapsed};
use crate::mirror::{Copier, Reconciler, SyncTotals, TreeWalker};

pub struct Application;

impl Application {
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let mut journal = DailyLog::open(&app_config.log_dir).context(JournalSnafu)?;

        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();

        Self::execute(&app_config, &mut input, &mut output, &mut journal)?;
        Ok(())
    }

    /// Loads the settings, waits for confirmation and mirrors the tree.
    ///
    /// Returns `None` when the operator declined, in which case nothing on
    /// disk has been touched.
    pub fn execute(
        app_config: &RuntimeConfig,
        input: &mut impl BufRead,
        output: &mut impl Write,
        journal: &mut impl Journal,
    ) -> Result<Option<SyncTotals>, ApplicationError> {
        journal.record("Application start");

        let settings = Settings::read(&app_config.settings).context(SettingsSnafu)?;
        debug!("Loaded settings: {:?}", settings);
        journal.record(&format!("Source: {}", settings.source.display()));
        journal.record(&format!("Target: {}", settings.target.display()));

        if !confirm(input, output).context(PromptSnafu)? {
            info!("Run not confirmed, exiting without changes");
            return Ok(None);
        }

        let start = Instant::now();
        let walker = TreeWalker::new(&settings.ignore);
        let totals = Reconciler::new(walker, Copier::default(), &mut *journal)
            .run(&settings.source, &settings.target);

        journal.record(&format!(
            "finish! total add:{}, del:{}, takes {}.",
            totals.added,
            totals.deleted,
            format_elapsed(start.elapsed())
        ));
        Ok(Some(totals))
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while opening the daily log"))]
    JournalError { source: JournalError },
    #[snafu(display("Critical failure encountered during configuration stage"))]
    SettingsError { source: SettingsError },
    #[snafu(display("Critical failure encountered while waiting for confirmation"))]
    PromptError { source: io::Error },
}
