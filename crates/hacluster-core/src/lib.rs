//! hacluster-core — shared plumbing for the HA cluster exporter.
//!
//! Holds the exporter configuration (`ha_cluster_exporter.toml`) and the
//! thin layer used to invoke the cluster tools (`crm_mon`, `cibadmin`,
//! `drbdsetup`). Nothing in here knows about metrics.

pub mod config;
pub mod error;
pub mod exec;

pub use config::{CollectorsConfig, ExporterConfig};
pub use error::{ConfigError, ExecError};
pub use exec::{CommandRunner, ScriptedCommandRunner, SystemCommandRunner, check_executables};
