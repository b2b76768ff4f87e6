use std::path::PathBuf;

use config::Config;
use serde::{Deserialize, Serialize};

use crate::{app::CalendarAppError, feed::OutputFormat};

/// prefix of environment variables overriding configuration keys, such as
/// `BAMBAM_CALENDAR_OVERWRITE=false`.
pub const ENV_PREFIX: &str = "BAMBAM_CALENDAR";

/// options for writing the extracted feed. read from an optional TOML file,
/// then from `BAMBAM_CALENDAR_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarAppConfig {
    /// replace the output archive if it already exists
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
    /// inferred from the output file extension when not set
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
    /// where to write the extraction summary as JSON
    #[serde(default)]
    pub summary_file: Option<PathBuf>,
}

fn default_overwrite() -> bool {
    true
}

impl Default for CalendarAppConfig {
    fn default() -> Self {
        Self {
            overwrite: default_overwrite(),
            output_format: None,
            summary_file: None,
        }
    }
}

impl CalendarAppConfig {
    pub fn load(config_filepath: Option<&str>) -> Result<CalendarAppConfig, CalendarAppError> {
        let mut builder = Config::builder();
        if let Some(filepath) = config_filepath {
            builder = builder.add_source(config::File::new(filepath, config::FileFormat::Toml));
        }
        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| CalendarAppError::ConfigReadError {
                msg: format!(
                    "failed reading configuration '{}'",
                    config_filepath.unwrap_or("<environment>")
                ),
                source: e,
            })?;
        config
            .try_deserialize::<CalendarAppConfig>()
            .map_err(|e| CalendarAppError::ConfigReadError {
                msg: String::from("failed deserializing configuration"),
                source: e,
            })
    }
}
