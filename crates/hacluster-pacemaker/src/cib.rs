//! Cluster Information Base snapshot, as printed by
//! `cibadmin --query --local`. Only location constraints are bound.

use std::path::PathBuf;
use std::sync::Arc;

use hacluster_core::CommandRunner;
use serde::Deserialize;

use crate::error::{PacemakerError, PacemakerResult};

const CIBADMIN_ARGS: [&str; 2] = ["--query", "--local"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Cib {
    pub configuration: Configuration,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub constraints: Constraints,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub rsc_location: Vec<LocationConstraint>,
}

/// `<rsc_location>`. Rule-based constraints carry no node or score and
/// come through with empty strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocationConstraint {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@node")]
    pub node: String,
    #[serde(rename = "@rsc")]
    pub resource: String,
    #[serde(rename = "@role")]
    pub role: String,
    #[serde(rename = "@score")]
    pub score: String,
}

pub fn parse_cib(raw: &[u8]) -> PacemakerResult<Cib> {
    let text = std::str::from_utf8(raw).map_err(|e| PacemakerError::CibParse(e.to_string()))?;
    quick_xml::de::from_str(text).map_err(|e| PacemakerError::CibParse(e.to_string()))
}

/// Runs `cibadmin` and decodes its output.
#[derive(Clone)]
pub struct CibParser {
    path: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl CibParser {
    pub fn new(path: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    pub fn parse(&self) -> PacemakerResult<Cib> {
        let raw = self
            .runner
            .run(&self.path, &CIBADMIN_ARGS)
            .map_err(PacemakerError::CibExec)?;
        parse_cib(&raw)
    }
}
