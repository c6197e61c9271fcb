//! Error types for configuration loading and command invocation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating the exporter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid log level '{0}' (expected error, warn, info, debug or trace)")]
    LogLevel(String),

    #[error("invalid listen address '{0}'")]
    Address(String),
}

/// Errors raised while checking or running an external tool.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("'{0}' does not exist")]
    NotFound(PathBuf),

    #[error("'{0}' is not a regular file")]
    NotAFile(PathBuf),

    #[error("'{0}' is not executable")]
    NotExecutable(PathBuf),

    #[error("failed to spawn '{path}': {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' exited with {status}: {stderr}")]
    Status {
        path: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("no scripted output for '{0}'")]
    Unscripted(PathBuf),
}
