//! Error types for the DRBD source.

use hacluster_core::ExecError;
use thiserror::Error;

pub type DrbdResult<T> = Result<T, DrbdError>;

#[derive(Debug, Error)]
pub enum DrbdError {
    #[error("could not initialize DRBD collector: {0}")]
    Init(#[source] ExecError),

    #[error("drbdsetup invocation failed: {0}")]
    Exec(#[source] ExecError),

    #[error("could not parse drbdsetup json: {0}")]
    Parse(#[from] serde_json::Error),
}
