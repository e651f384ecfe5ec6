//! Configuration loading from gocd-params.toml.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{IoResultExt, ParamsError, ParamsResult};

/// Default settings file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "gocd-params.toml";

/// Main configuration structure for gocd-params.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ParamsConfig {
    /// Parameter names never reported as unused.
    pub ignore: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

impl ParamsConfig {
    /// True if the file asks for JSON output.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }

    /// Configured ignore list, empty if unset.
    pub fn ignored(&self) -> &[String] {
        self.ignore.as_deref().unwrap_or_default()
    }
}

/// Loads configuration from gocd-params.toml in `dir` if it exists.
pub fn load_config(dir: &Path) -> ParamsResult<Option<ParamsConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    load_config_file(&path).map(Some)
}

/// Loads configuration from an explicit path, which must exist.
///
/// Read failures are [`ParamsError::Io`]; malformed TOML or wrongly typed
/// keys are [`ParamsError::Config`].
pub fn load_config_file(path: &Path) -> ParamsResult<ParamsConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    toml::from_str(&content).map_err(|e| ParamsError::config(path, e.to_string()))
}
