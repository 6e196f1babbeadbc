use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub settings: PathBuf,
    pub log_dir: PathBuf,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            settings: cli.settings,
            log_dir: cli.log_dir,
        }
    }
}
