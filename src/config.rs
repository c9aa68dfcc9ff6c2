use std::fs::File;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;

pub const DEFAULT_INPUT_FILE: &str = "../data/bus_lines_data.txt";
pub const DEFAULT_OUTPUT_FILE: &str = "../data/buslines_analysis_report.txt";
pub const DEFAULT_CONFIG_FILE: &str = "config.txt";

/// Fully resolved run configuration. Built once, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub console_output: bool,
    pub file_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input_file: DEFAULT_INPUT_FILE.into(),
            output_file: DEFAULT_OUTPUT_FILE.into(),
            console_output: true,
            file_output: true,
        }
    }
}

/// One configuration layer. `None` leaves the value of the layer below untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub input_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub console_output: Option<bool>,
    pub file_output: Option<bool>,
}

impl Settings {
    pub fn with(self, overrides: Overrides) -> Self {
        Settings {
            input_file: overrides.input_file.unwrap_or(self.input_file),
            output_file: overrides.output_file.unwrap_or(self.output_file),
            console_output: overrides.console_output.unwrap_or(self.console_output),
            file_output: overrides.file_output.unwrap_or(self.file_output),
        }
    }

    /// Defaults, then the config file at `config_path`, then `cli`.
    pub fn resolve(config_path: &Path, cli: Overrides) -> Result<Self, ConfigError> {
        Ok(Settings::default()
            .with(load_config_file(config_path)?)
            .with(cli))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Could not read configuration: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid value '{value}' for '{key}', expected an integer")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Deserialize)]
struct ConfigEntry {
    key: String,
    /// Everything after the first `=`, split again on every further `=`.
    value: Vec<String>,
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    value
        .parse::<i64>()
        .map(|it| it != 0)
        .map_err(|_| ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
        })
}

fn reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .comment(Some(b'#'))
        .delimiter(b'=')
        .trim(csv::Trim::All);

    builder
}

/// Parses `key=value` lines. Unknown keys and keys without a value are skipped. A value may
/// itself contain `=`; whitespace around each `=` is dropped.
pub fn parse_config(stream: impl std::io::Read) -> Result<Overrides, ConfigError> {
    let mut overrides = Overrides::default();
    for entry in reader().from_reader(stream).deserialize::<ConfigEntry>() {
        let entry = entry?;
        let value = entry.value.join("=");
        if value.is_empty() {
            debug!("Ignoring config key without value: {}", entry.key);
            continue;
        }
        match entry.key.as_str() {
            "input_file" => overrides.input_file = Some(value.into()),
            "output_file" => overrides.output_file = Some(value.into()),
            "stdout_output" => overrides.console_output = Some(parse_flag(&entry.key, &value)?),
            "file_output" => overrides.file_output = Some(parse_flag(&entry.key, &value)?),
            other => debug!("Ignoring unknown config key: {}", other),
        }
    }
    Ok(overrides)
}

/// A config file that cannot be opened is not an error; the defaults stay in force.
pub fn load_config_file(path: &Path) -> Result<Overrides, ConfigError> {
    match File::open(path) {
        Ok(file) => parse_config(file),
        Err(err) => {
            warn!(
                "Configuration file '{}' not found ({}), falling back to defaults",
                path.display(),
                err
            );
            Ok(Overrides::default())
        }
    }
}
