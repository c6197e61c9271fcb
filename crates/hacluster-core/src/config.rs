//! ha_cluster_exporter.toml configuration parser.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Config file picked up when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ha_cluster_exporter.toml";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExporterConfig {
    pub address: String,
    pub port: u16,
    pub log_level: String,
    pub crm_mon_path: PathBuf,
    pub cibadmin_path: PathBuf,
    pub drbdsetup_path: PathBuf,
    pub drbd_split_brain_path: PathBuf,
    pub collectors: CollectorsConfig,
}

/// Per-collector switches; a disabled collector is never constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorsConfig {
    pub pacemaker: bool,
    pub drbd: bool,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 9664,
            log_level: "info".to_string(),
            crm_mon_path: PathBuf::from("/usr/sbin/crm_mon"),
            cibadmin_path: PathBuf::from("/usr/sbin/cibadmin"),
            drbdsetup_path: PathBuf::from("/sbin/drbdsetup"),
            drbd_split_brain_path: PathBuf::from("/var/run/drbd/splitbrain"),
            collectors: CollectorsConfig::default(),
        }
    }
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            pacemaker: true,
            drbd: true,
        }
    }
}

impl ExporterConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit config file if given, else the default one when it
    /// exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_PATH);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::LogLevel(self.log_level.clone()));
        }
        self.listen_addr()?;
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .address
            .parse()
            .map_err(|_| ConfigError::Address(self.address.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
