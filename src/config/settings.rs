use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Yaml};
use snafu::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{ext::PathExt, mirror::DEFAULT_IGNORED};

pub const SETTINGS_FILE_NAME: &str = "appsettings.json";

/// Where to mirror from and to.
///
/// The document is JSON, which the YAML loader reads as-is, so plain YAML
/// works as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub source: PathBuf,
    pub target: PathBuf,
    pub ignore: Vec<String>,
}

impl Settings {
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        debug!("Reading settings file: {}", path.best_effort_display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.best_effort_display(),
        })?;
        debug!("Read settings file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    fn required_path<'y>(
        top_level: &LinkedHashMap<Yaml<'y>, Yaml<'y>>,
        field: &'static str,
    ) -> Result<PathBuf, SettingsError> {
        let value = lookup(top_level, field).context(MissingFieldSnafu { field })?;
        let text = value.as_str().context(FieldNotStringSnafu { field })?;
        Ok(PathBuf::from(text))
    }

    fn ignore_list<'y>(
        top_level: &LinkedHashMap<Yaml<'y>, Yaml<'y>>,
    ) -> Result<Vec<String>, SettingsError> {
        let Some(value) = lookup(top_level, "ignore") else {
            return Ok(DEFAULT_IGNORED.iter().map(|name| name.to_string()).collect());
        };

        value
            .as_sequence()
            .context(IgnoreNotSequenceSnafu)?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .context(IgnoreNotSequenceSnafu)
            })
            .collect()
    }
}

fn lookup<'a, 'y>(
    top_level: &'a LinkedHashMap<Yaml<'y>, Yaml<'y>>,
    key: &str,
) -> Option<&'a Yaml<'y>> {
    top_level
        .iter()
        .find(|(name, _)| name.as_str() == Some(key))
        .map(|(_, value)| value)
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        Ok(Settings {
            source: Self::required_path(top_level, "source")?,
            target: Self::required_path(top_level, "target")?,
            ignore: Self::ignore_list(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted settings file"))]
    MalformedConfig,
    #[snafu(display("Top level of settings should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Settings are missing the '{}' field", field))]
    MissingField { field: &'static str },
    #[snafu(display("Settings field '{}' should be a string", field))]
    FieldNotString { field: &'static str },
    #[snafu(display("Settings field 'ignore' should be a list of names"))]
    IgnoreNotSequence,
}
