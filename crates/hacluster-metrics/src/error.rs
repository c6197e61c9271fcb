//! Error types for sample construction.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("metric '{0}' has no registered descriptor")]
    UnknownMetric(String),

    #[error("metric '{name}' expects {expected} label values, got {actual}")]
    LabelArity {
        name: String,
        expected: usize,
        actual: usize,
    },
}
