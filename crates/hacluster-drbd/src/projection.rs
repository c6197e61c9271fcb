//! Projection of DRBD snapshots into metric samples.

use hacluster_metrics::{DescriptorRegistry, MetricSink};
use tracing::warn;

use crate::split_brain::SplitBrainMarker;
use crate::status::{Connection, DrbdResource};

pub const SUBSYSTEM: &str = "drbd";

const DEVICE_LABELS: [&str; 2] = ["resource", "volume"];
const PEER_LABELS: [&str; 3] = ["resource", "peer_node_id", "volume"];

/// Descriptor table of the DRBD collector.
pub fn descriptors() -> DescriptorRegistry {
    let mut r = DescriptorRegistry::new(SUBSYSTEM);
    r.gauge(
        "resources",
        "The DRBD resources; 1 line per name, per volume",
        &["resource", "role", "volume", "disk_state"],
    );
    r.gauge("written", "KiB written to DRBD; 1 line per res, per volume", &DEVICE_LABELS);
    r.gauge("read", "KiB read from DRBD; 1 line per res, per volume", &DEVICE_LABELS);
    r.gauge("al_writes", "Writes to activity log; 1 line per res, per volume", &DEVICE_LABELS);
    r.gauge("bm_writes", "Writes to bitmap; 1 line per res, per volume", &DEVICE_LABELS);
    r.gauge("upper_pending", "Upper pending; 1 line per res, per volume", &DEVICE_LABELS);
    r.gauge("lower_pending", "Lower pending; 1 line per res, per volume", &DEVICE_LABELS);
    r.gauge("quorum", "Quorum status per resource and per volume", &DEVICE_LABELS);
    r.gauge(
        "connections",
        "The DRBD resource connections; 1 line per per resource, per peer_node_id",
        &["resource", "peer_node_id", "peer_role", "volume", "peer_disk_state"],
    );
    r.gauge(
        "connections_sync",
        "The in sync percentage value for DRBD resource connections",
        &PEER_LABELS,
    );
    r.gauge("connections_received", "KiB received per connection", &PEER_LABELS);
    r.gauge("connections_sent", "KiB sent per connection", &PEER_LABELS);
    r.gauge("connections_pending", "Pending value per connection", &PEER_LABELS);
    r.gauge("connections_unacked", "Unacked value per connection", &PEER_LABELS);
    r.gauge(
        "split_brain",
        "Whether a split brain has been detected; 1 line per resource, per volume.",
        &DEVICE_LABELS,
    );
    r
}

pub fn project(
    r: &DescriptorRegistry,
    resources: &[DrbdResource],
    split_brains: &[SplitBrainMarker],
    sink: &mut dyn MetricSink,
) {
    for resource in resources {
        record_devices(r, resource, sink);
        record_connections(r, resource, sink);
    }
    record_split_brains(r, split_brains, sink);
}

/// `resources` is always 1: a volume that is not monitored has no sample
/// at all rather than a 0.
pub fn record_devices(r: &DescriptorRegistry, resource: &DrbdResource, sink: &mut dyn MetricSink) {
    let name = resource.name.as_str();
    for device in &resource.devices {
        let volume = device.volume.to_string();
        let labels = [name, volume.as_str()];

        r.record(
            sink,
            "resources",
            1.0,
            &[
                name,
                resource.role.as_str(),
                volume.as_str(),
                device.disk_state.to_lowercase().as_str(),
            ],
        );
        r.record(sink, "written", device.written as f64, &labels);
        r.record(sink, "read", device.read as f64, &labels);
        r.record(sink, "al_writes", device.al_writes as f64, &labels);
        r.record(sink, "bm_writes", device.bm_writes as f64, &labels);
        r.record(sink, "upper_pending", device.upper_pending as f64, &labels);
        r.record(sink, "lower_pending", device.lower_pending as f64, &labels);
        r.record(sink, "quorum", if device.quorum { 1.0 } else { 0.0 }, &labels);
    }
}

/// Resources without connections and connections without peer devices
/// are skipped with a warning.
pub fn record_connections(r: &DescriptorRegistry, resource: &DrbdResource, sink: &mut dyn MetricSink) {
    if resource.connections.is_empty() {
        warn!(resource = %resource.name, "could not retrieve connection info for resource");
        return;
    }

    for conn in &resource.connections {
        if conn.peer_devices.is_empty() {
            warn!(
                resource = %resource.name,
                peer_node_id = conn.peer_node_id,
                "could not retrieve any peer device info for connection"
            );
            continue;
        }
        record_peer_devices(r, &resource.name, conn, sink);
    }
}

fn record_peer_devices(r: &DescriptorRegistry, resource: &str, conn: &Connection, sink: &mut dyn MetricSink) {
    let peer_node_id = conn.peer_node_id.to_string();
    for peer in &conn.peer_devices {
        let volume = peer.volume.to_string();
        let labels = [resource, peer_node_id.as_str(), volume.as_str()];

        r.record(
            sink,
            "connections",
            1.0,
            &[
                resource,
                peer_node_id.as_str(),
                conn.peer_role.as_str(),
                volume.as_str(),
                peer.peer_disk_state.to_lowercase().as_str(),
            ],
        );
        r.record(sink, "connections_sync", peer.percent_in_sync, &labels);
        r.record(sink, "connections_received", peer.received as f64, &labels);
        r.record(sink, "connections_sent", peer.sent as f64, &labels);
        r.record(sink, "connections_pending", peer.pending as f64, &labels);
        r.record(sink, "connections_unacked", peer.unacked as f64, &labels);
    }
}

pub fn record_split_brains(r: &DescriptorRegistry, markers: &[SplitBrainMarker], sink: &mut dyn MetricSink) {
    for marker in markers {
        r.record(
            sink,
            "split_brain",
            1.0,
            &[marker.resource.as_str(), marker.volume.as_str()],
        );
    }
}
