//! `crm_mon` status snapshot.
//!
//! Mirrors the document printed by `crm_mon -X --group-by-node --inactive`.
//! XML attributes are bound with an `@` prefix; every field also carries
//! a plain-name alias so a JSON rendering of the same document shape
//! deserializes into the same types.

use std::path::PathBuf;
use std::sync::Arc;

use hacluster_core::CommandRunner;
use serde::Deserialize;

use crate::error::{PacemakerError, PacemakerResult};

const CRM_MON_ARGS: [&str; 3] = ["-X", "--group-by-node", "--inactive"];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrmMon {
    #[serde(rename = "@version", alias = "version")]
    pub version: String,
    pub summary: Summary,
    pub nodes: Nodes,
    pub resources: Resources,
    pub node_history: NodeHistory,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub last_change: LastChange,
    pub cluster_options: ClusterOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LastChange {
    #[serde(rename = "@time", alias = "time")]
    pub time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClusterOptions {
    #[serde(rename = "@stonith-enabled", alias = "stonith-enabled")]
    pub stonith_enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Nodes {
    pub node: Vec<Node>,
}

/// A cluster node and the resources currently placed on it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Node {
    #[serde(rename = "@name", alias = "name")]
    pub name: String,
    #[serde(rename = "@type", alias = "type")]
    pub node_type: String,
    #[serde(rename = "@online", alias = "online")]
    pub online: bool,
    #[serde(rename = "@standby", alias = "standby")]
    pub standby: bool,
    #[serde(rename = "@standby_onfail", alias = "standby_onfail")]
    pub standby_onfail: bool,
    #[serde(rename = "@maintenance", alias = "maintenance")]
    pub maintenance: bool,
    #[serde(rename = "@pending", alias = "pending")]
    pub pending: bool,
    #[serde(rename = "@unclean", alias = "unclean")]
    pub unclean: bool,
    #[serde(rename = "@shutdown", alias = "shutdown")]
    pub shutdown: bool,
    #[serde(rename = "@expected_up", alias = "expected_up")]
    pub expected_up: bool,
    #[serde(rename = "@is_dc", alias = "is_dc")]
    pub dc: bool,
    #[serde(rename = "resource")]
    pub resources: Vec<Resource>,
}

impl Node {
    /// Status flags in a fixed order; several can be set at once.
    pub fn statuses(&self) -> [(&'static str, bool); 9] {
        [
            ("online", self.online),
            ("standby", self.standby),
            ("standby_onfail", self.standby_onfail),
            ("maintenance", self.maintenance),
            ("pending", self.pending),
            ("unclean", self.unclean),
            ("shutdown", self.shutdown),
            ("expected_up", self.expected_up),
            ("dc", self.dc),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Resource {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
    #[serde(rename = "@role", alias = "role")]
    pub role: String,
    #[serde(rename = "@managed", alias = "managed")]
    pub managed: bool,
    #[serde(rename = "@active", alias = "active")]
    pub active: bool,
    #[serde(rename = "@orphaned", alias = "orphaned")]
    pub orphaned: bool,
    #[serde(rename = "@blocked", alias = "blocked")]
    pub blocked: bool,
    #[serde(rename = "@failed", alias = "failed")]
    pub failed: bool,
    #[serde(rename = "@failure_ignored", alias = "failure_ignored")]
    pub failure_ignored: bool,
}

impl Resource {
    /// Status flags in a fixed order; several can be set at once.
    pub fn statuses(&self) -> [(&'static str, bool); 5] {
        [
            ("active", self.active),
            ("orphaned", self.orphaned),
            ("blocked", self.blocked),
            ("failed", self.failed),
            ("failure_ignored", self.failure_ignored),
        ]
    }
}

/// Resources not listed under any node (stopped, or inactive members of
/// clones and groups).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub resource: Vec<Resource>,
    pub clone: Vec<CloneSet>,
    pub group: Vec<Group>,
}

impl Resources {
    /// Every primitive resource in this section, clone and group members
    /// included.
    pub fn primitives(&self) -> impl Iterator<Item = &Resource> {
        let cloned = self.clone.iter().flat_map(|c| {
            c.resource
                .iter()
                .chain(c.group.iter().flat_map(|g| g.resource.iter()))
        });
        let grouped = self.group.iter().flat_map(|g| g.resource.iter());
        self.resource.iter().chain(cloned).chain(grouped)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CloneSet {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
    pub resource: Vec<Resource>,
    pub group: Vec<Group>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Group {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
    pub resource: Vec<Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeHistory {
    pub node: Vec<NodeHistoryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeHistoryEntry {
    #[serde(rename = "@name", alias = "name")]
    pub name: String,
    pub resource_history: Vec<ResourceHistory>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResourceHistory {
    #[serde(rename = "@id", alias = "id")]
    pub id: String,
    #[serde(rename = "@migration-threshold", alias = "migration-threshold")]
    pub migration_threshold: i64,
    #[serde(rename = "@fail-count", alias = "fail-count")]
    pub fail_count: i64,
}

/// Decode `crm_mon` output, XML or JSON depending on the first
/// non-whitespace byte.
pub fn parse_crm_mon(raw: &[u8]) -> PacemakerResult<CrmMon> {
    match raw.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'<') => {
            let text = std::str::from_utf8(raw).map_err(|e| PacemakerError::CrmMonParse(e.to_string()))?;
            quick_xml::de::from_str(text).map_err(|e| PacemakerError::CrmMonParse(e.to_string()))
        }
        Some(b'{') => serde_json::from_slice(raw).map_err(|e| PacemakerError::CrmMonParse(e.to_string())),
        Some(_) => Err(PacemakerError::CrmMonParse(
            "output is neither an XML nor a JSON document".to_string(),
        )),
        None => Err(PacemakerError::CrmMonParse("empty output".to_string())),
    }
}

/// Runs `crm_mon` and decodes its output.
#[derive(Clone)]
pub struct CrmMonParser {
    path: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl CrmMonParser {
    pub fn new(path: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    pub fn parse(&self) -> PacemakerResult<CrmMon> {
        let raw = self
            .runner
            .run(&self.path, &CRM_MON_ARGS)
            .map_err(PacemakerError::CrmMonExec)?;
        parse_crm_mon(&raw)
    }
}
