//! Configuration management and validation.
//!
//! Configuration is layered: built-in defaults, then an optional JSON
//! config file, then command-line overrides applied by the CLI.

use crate::constants::{APP_CONFIG_DIR, CONFIG_FILE_NAME, DEFAULT_DELIMITER, DEFAULT_INPUT_PATH};
use crate::error::{PostalError, Result};
use crate::models::ReportFormat;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Settings for one processing run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtremesConfig {
    /// Delimited postal dataset to read
    pub input_path: PathBuf,

    /// Extremes table destination (stdout when unset)
    pub extremes_output: Option<PathBuf>,

    /// Flat listing destination (stdout when unset)
    pub listing_output: Option<PathBuf>,

    /// Fixed-width record export destination (disabled when unset)
    pub records_output: Option<PathBuf>,

    /// Layout of the extremes table and the listing
    pub format: ReportFormat,

    /// Field delimiter of the input, also used for csv reports
    pub delimiter: char,

    /// Treat the first input line as a header
    pub skip_header: bool,

    /// Show a progress spinner on stderr while ingesting
    pub show_progress: bool,
}

impl Default for ExtremesConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            extremes_output: None,
            listing_output: None,
            records_output: None,
            format: ReportFormat::Table,
            delimiter: DEFAULT_DELIMITER,
            skip_header: true,
            show_progress: true,
        }
    }
}

impl ExtremesConfig {
    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_extremes_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.extremes_output = Some(path.into());
        self
    }

    pub fn with_listing_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.listing_output = Some(path.into());
        self
    }

    pub fn with_records_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.records_output = Some(path.into());
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Process the first line as data
    pub fn without_header(mut self) -> Self {
        self.skip_header = false;
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Check the settings can describe a run
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(PostalError::configuration("input path is empty"));
        }

        if matches!(self.delimiter, '\n' | '\r') {
            return Err(PostalError::configuration(format!(
                "delimiter {:?} conflicts with line endings",
                self.delimiter
            )));
        }

        let input = resolve_path(&self.input_path);
        let outputs: Vec<(&str, &PathBuf, PathBuf)> = [
            ("extremes", &self.extremes_output),
            ("listing", &self.listing_output),
            ("records", &self.records_output),
        ]
        .into_iter()
        .filter_map(|(name, path)| path.as_ref().map(|path| (name, path, resolve_path(path))))
        .collect();

        for (i, (name, path, resolved)) in outputs.iter().enumerate() {
            if *resolved == input {
                return Err(PostalError::configuration(format!(
                    "{} output would overwrite the input file {}",
                    name,
                    path.display()
                )));
            }

            for (other_name, _, other) in &outputs[i + 1..] {
                if other == resolved {
                    return Err(PostalError::configuration(format!(
                        "{} and {} outputs both write to {}",
                        name,
                        other_name,
                        path.display()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Per-user config file location, if the platform has a config directory
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load settings from a JSON file; missing keys keep their defaults
    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PostalError::configuration(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config = serde_json::from_str(&contents).map_err(|e| {
            PostalError::configuration(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Defaults overlaid with `config_file`, or with the per-user config file
    /// when no explicit file is given and one exists
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_file {
            info!("Using config file: {}", path.display());
            return Self::load_file(path);
        }

        match Self::default_config_path().filter(|path| path.exists()) {
            Some(path) => {
                info!("Using config file: {}", path.display());
                Self::load_file(&path)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Absolute form of `path` with `.` and `..` removed, resolved through
/// symlinks as far as the path exists on disk
fn resolve_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    // The output file usually does not exist yet; resolve its directory
    match (normalized.parent(), normalized.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(parent) => parent.join(name),
            Err(_) => normalized,
        },
        _ => normalized,
    }
}
