use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;
use crate::config::SETTINGS_FILE_NAME;

/// Mirror a source directory tree onto a target directory tree.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Settings document holding the `source` and `target` paths
    #[clap(long, short, default_value = SETTINGS_FILE_NAME)]
    pub settings: PathBuf,

    /// Directory receiving the daily `YYYYMMDD.log` files
    #[clap(long, short = 'd', default_value = ".")]
    pub log_dir: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
