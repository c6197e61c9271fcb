//! Error types for the Pacemaker sources.

use hacluster_core::ExecError;
use thiserror::Error;

pub type PacemakerResult<T> = Result<T, PacemakerError>;

#[derive(Debug, Error)]
pub enum PacemakerError {
    #[error("could not initialize Pacemaker collector: {0}")]
    Init(#[source] ExecError),

    #[error("crm_mon invocation failed: {0}")]
    CrmMonExec(#[source] ExecError),

    #[error("cibadmin invocation failed: {0}")]
    CibExec(#[source] ExecError),

    #[error("could not parse crm_mon output: {0}")]
    CrmMonParse(String),

    #[error("could not parse cibadmin output: {0}")]
    CibParse(String),

    #[error("invalid last-change timestamp '{value}': {reason}")]
    LastChange { value: String, reason: String },
}
