use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::hardware::probe::{DEFAULT_LSHW_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use crate::hardware::ProbePaths;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Agent settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub probe_timeout_secs: u64,
    pub lshw_timeout_secs: u64,
    pub report_timeout_secs: u64,
    pub boot_interface: String,
    pub dmi_dir: PathBuf,
    pub net_class_dir: PathBuf,
    pub bmc_device: PathBuf,
    pub log_file: Option<PathBuf>,
    pub report_url: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let paths = ProbePaths::default();
        Self {
            probe_timeout_secs: DEFAULT_TIMEOUT_SECS,
            lshw_timeout_secs: DEFAULT_LSHW_TIMEOUT_SECS,
            report_timeout_secs: 30,
            boot_interface: paths.boot_interface,
            dmi_dir: paths.dmi_dir,
            net_class_dir: paths.net_class_dir,
            bmc_device: paths.bmc_device,
            log_file: None,
            report_url: "http://localhost:6183".to_string(),
        }
    }
}

impl AgentConfig {
    /// `~/.config/hwinfo-agent/config.yaml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hwinfo-agent").join("config.yaml"))
    }

    /// Load `explicit` if given, else the default path if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, secs) in [
            ("probe_timeout_secs", self.probe_timeout_secs),
            ("lshw_timeout_secs", self.lshw_timeout_secs),
            ("report_timeout_secs", self.report_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::ZeroTimeout(name));
            }
        }
        Ok(())
    }

    /// Command-line flags win over the file. `--timeout` sets the general
    /// probe timeout only; lshw keeps its own.
    pub fn apply_overrides(&mut self, timeout_secs: Option<u64>, log_file: Option<PathBuf>) -> Result<(), ConfigError> {
        if let Some(secs) = timeout_secs {
            self.probe_timeout_secs = secs;
        }
        if log_file.is_some() {
            self.log_file = log_file;
        }
        self.validate()
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn lshw_timeout(&self) -> Duration {
        Duration::from_secs(self.lshw_timeout_secs)
    }

    pub fn report_timeout(&self) -> Duration {
        Duration::from_secs(self.report_timeout_secs)
    }

    pub fn probe_paths(&self) -> ProbePaths {
        ProbePaths {
            dmi_dir: self.dmi_dir.clone(),
            net_class_dir: self.net_class_dir.clone(),
            boot_interface: self.boot_interface.clone(),
            bmc_device: self.bmc_device.clone(),
        }
    }
}
