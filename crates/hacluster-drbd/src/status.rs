//! `drbdsetup status --json` snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use hacluster_core::CommandRunner;
use serde::Deserialize;

use crate::error::{DrbdError, DrbdResult};

const DRBDSETUP_ARGS: [&str; 2] = ["status", "--json"];

/// One DRBD resource with its local volumes and peer connections.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DrbdResource {
    pub name: String,
    pub role: String,
    pub devices: Vec<Device>,
    pub connections: Vec<Connection>,
}

/// A local volume. Counters are in KiB as reported by the kernel module.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Device {
    pub volume: u32,
    pub written: u64,
    pub read: u64,
    pub al_writes: u64,
    pub bm_writes: u64,
    pub upper_pending: u64,
    pub lower_pending: u64,
    pub quorum: bool,
    pub disk_state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Connection {
    pub peer_node_id: u32,
    pub peer_role: String,
    // drbdsetup spells this one with an underscore
    #[serde(rename = "peer_devices")]
    pub peer_devices: Vec<PeerDevice>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PeerDevice {
    pub volume: u32,
    pub received: u64,
    pub sent: u64,
    pub pending: u64,
    pub unacked: u64,
    pub peer_disk_state: String,
    pub percent_in_sync: f64,
}

pub fn parse_drbd_status(raw: &[u8]) -> DrbdResult<Vec<DrbdResource>> {
    Ok(serde_json::from_slice(raw)?)
}

/// Runs `drbdsetup` and decodes its output.
#[derive(Clone)]
pub struct DrbdStatusParser {
    path: PathBuf,
    runner: Arc<dyn CommandRunner>,
}

impl DrbdStatusParser {
    pub fn new(path: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    pub fn parse(&self) -> DrbdResult<Vec<DrbdResource>> {
        let raw = self
            .runner
            .run(&self.path, &DRBDSETUP_ARGS)
            .map_err(DrbdError::Exec)?;
        parse_drbd_status(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_JSON: &str = include_str!("../tests/fixtures/drbdsetup_status.json");

    #[test]
    fn parse_status_document() {
        let resources = parse_drbd_status(STATUS_JSON.as_bytes()).unwrap();
        assert_eq!(resources.len(), 2);

        let res = &resources[0];
        assert_eq!(res.name, "1-single-0");
        assert_eq!(res.role, "Secondary");
        assert_eq!(
            res.devices[0],
            Device {
                volume: 0,
                written: 123456,
                read: 654321,
                al_writes: 123,
                bm_writes: 321,
                upper_pending: 1,
                lower_pending: 2,
                quorum: true,
                disk_state: "UpToDate".to_string(),
            }
        );

        let conn = &res.connections[0];
        assert_eq!(conn.peer_node_id, 1);
        assert_eq!(conn.peer_role, "Primary");
        assert_eq!(conn.peer_devices[0].percent_in_sync, 100.0);
        assert_eq!(conn.peer_devices[0].unacked, 4);

        assert!(resources[1].connections.is_empty());
    }

    #[test]
    fn parse_empty_list() {
        assert!(parse_drbd_status(b"[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_non_json() {
        assert!(matches!(
            parse_drbd_status(b"No currently configured DRBD found."),
            Err(DrbdError::Parse(_))
        ));
    }
}
