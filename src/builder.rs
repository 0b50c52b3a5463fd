use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::defaults::apply_defaults;
use crate::env;
use crate::error::YamfigError;
use crate::overrides::from_arguments;
use crate::record::Record;
use crate::types::{Stage, StageFailure};
use crate::yaml;

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "./config.yml";

/// Load `record` from every source, ignoring failures.
///
/// Runs defaults, the YAML file at `path` (`./config.yml` when empty),
/// environment variables prefixed with `app_name`, and the process
/// arguments. A failing stage is logged and the next one still runs.
pub fn load<R>(app_name: &str, path: impl AsRef<Path>, record: &mut R)
where
    R: Record + Serialize + DeserializeOwned,
{
    let path = path.as_ref();
    let mut loader = Loader::new().app_name(app_name);
    if !path.as_os_str().is_empty() {
        loader = loader.file(path);
    }
    loader.load_into(record);
}

/// Builder for layered loading.
///
/// Each source can be swapped for an injected one or switched off:
///
/// - **File**: [`file()`](Self::file) / [`no_file()`](Self::no_file), default `./config.yml`.
/// - **Environment**: [`env_vars()`](Self::env_vars) / [`no_env()`](Self::no_env), default the process environment.
/// - **Arguments**: [`args()`](Self::args) / [`no_args()`](Self::no_args), default `std::env::args().skip(1)`.
#[derive(Debug, Clone)]
pub struct Loader {
    app_name: String,
    file: Option<PathBuf>,
    file_enabled: bool,
    env_vars: Option<Vec<(String, String)>>,
    env_enabled: bool,
    args: Option<Vec<String>>,
    args_enabled: bool,
    strict: bool,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    pub fn new() -> Self {
        Self {
            app_name: String::new(),
            file: None,
            file_enabled: true,
            env_vars: None,
            env_enabled: true,
            args: None,
            args_enabled: true,
            strict: false,
        }
    }

    /// Set the application name, which prefixes environment variable names
    /// (`myapp` → `MYAPP_*`). Empty means no prefix.
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = name.to_string();
        self
    }

    /// Read the config file from `path` instead of `./config.yml`.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self.file_enabled = true;
        self
    }

    /// Skip the config file stage.
    pub fn no_file(mut self) -> Self {
        self.file_enabled = false;
        self
    }

    /// Read variables from `vars` instead of the process environment.
    pub fn env_vars(mut self, vars: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env_vars = Some(vars.into_iter().collect());
        self.env_enabled = true;
        self
    }

    /// Disable environment variable loading entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Apply these `key=value` entries instead of the process arguments.
    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self.args_enabled = true;
        self
    }

    /// Skip the arguments stage.
    pub fn no_args(mut self) -> Self {
        self.args_enabled = false;
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, unknown keys in the config file produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub(crate) fn effective_file_path(&self) -> PathBuf {
        self.file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Run every stage, logging and collecting failures instead of stopping.
    ///
    /// Fields set by a stage stay set even when a later stage fails.
    pub fn load_into<R>(&self, record: &mut R) -> Vec<StageFailure>
    where
        R: Record + Serialize + DeserializeOwned,
    {
        let mut failures = Vec::new();
        for stage in Stage::ALL {
            let Err(error) = self.run_stage(stage, record) else {
                continue;
            };
            if error.is_missing_file() {
                debug!(%stage, %error, "no config file, skipping");
            } else {
                warn!(%stage, %error, "ignoring failed configuration stage");
            }
            failures.push(StageFailure { stage, error });
        }
        failures
    }

    /// Run every stage, stopping at the first failure.
    ///
    /// A missing file at the default path is not an error; a missing file
    /// set through [`file()`](Self::file) is.
    pub fn try_load_into<R>(&self, record: &mut R) -> Result<(), YamfigError>
    where
        R: Record + Serialize + DeserializeOwned,
    {
        for stage in Stage::ALL {
            match self.run_stage(stage, record) {
                Err(e) if stage == Stage::File && self.file.is_none() && e.is_missing_file() => {
                    debug!(%stage, error = %e, "no config file, skipping");
                }
                other => other?,
            }
        }
        Ok(())
    }

    fn run_stage<R>(&self, stage: Stage, record: &mut R) -> Result<(), YamfigError>
    where
        R: Record + Serialize + DeserializeOwned,
    {
        match stage {
            Stage::Defaults => apply_defaults(record),
            Stage::File if self.file_enabled => {
                yaml::overlay_file(&self.effective_file_path(), record, self.strict)
            }
            Stage::Environment if self.env_enabled => match &self.env_vars {
                Some(vars) => env::from_env_vars(&self.app_name, vars.iter().cloned(), record),
                None => env::from_environment(&self.app_name, record),
            },
            Stage::Arguments if self.args_enabled => match &self.args {
                Some(args) => from_arguments(args, record),
                None => from_arguments(std::env::args().skip(1), record),
            },
            _ => Ok(()),
        }
    }
}
