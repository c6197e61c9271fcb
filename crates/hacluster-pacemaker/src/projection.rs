//! Projection of Pacemaker snapshots into metric samples.
//!
//! Every function here is pure: it reads a snapshot and pushes samples
//! into the sink, in a deterministic order.

use hacluster_metrics::{DescriptorRegistry, MetricSink};
use tracing::warn;

use crate::cib::Cib;
use crate::crmmon::{CrmMon, Resource};
use crate::decode::{constraint_score, fail_count_value, node_type_label, parse_last_change};

pub const SUBSYSTEM: &str = "pacemaker";

/// Descriptor table of the Pacemaker collector.
pub fn descriptors() -> DescriptorRegistry {
    let mut r = DescriptorRegistry::new(SUBSYSTEM);
    r.gauge(
        "nodes",
        "The nodes in the cluster; one line per name, per status",
        &["node", "type", "status"],
    );
    r.gauge(
        "resources",
        "The resources in the cluster; one line per id, per status",
        &["node", "resource", "role", "managed", "status"],
    );
    r.gauge("stonith_enabled", "Whether or not stonith is enabled", &[]);
    r.gauge(
        "fail_count",
        "The Fail count number per node and resource id",
        &["node", "resource"],
    );
    r.gauge(
        "migration_threshold",
        "The migration_threshold number per node and resource id",
        &["node", "resource"],
    );
    r.counter(
        "config_last_change",
        "The timestamp of the last change of the cluster configuration",
        &[],
    );
    r.gauge(
        "location_constraints",
        "Resource location constraints. The value indicates the score.",
        &["constraint", "node", "resource", "role"],
    );
    r
}

/// Project both snapshots of one collection pass.
pub fn project(r: &DescriptorRegistry, crm_mon: &CrmMon, cib: &Cib, sink: &mut dyn MetricSink) {
    record_stonith(r, crm_mon, sink);
    record_nodes(r, crm_mon, sink);
    record_ungrouped_resources(r, crm_mon, sink);
    record_fail_counts(r, crm_mon, sink);
    record_migration_thresholds(r, crm_mon, sink);
    record_config_last_change(r, crm_mon, sink);
    record_constraints(r, cib, sink);
}

pub fn record_stonith(r: &DescriptorRegistry, crm_mon: &CrmMon, sink: &mut dyn MetricSink) {
    let enabled = if crm_mon.summary.cluster_options.stonith_enabled {
        1.0
    } else {
        0.0
    };
    r.record(sink, "stonith_enabled", enabled, &[]);
}

/// One `nodes` sample per node per set flag, followed by the resources
/// running on that node.
pub fn record_nodes(r: &DescriptorRegistry, crm_mon: &CrmMon, sink: &mut dyn MetricSink) {
    for node in &crm_mon.nodes.node {
        let node_type = node_type_label(&node.node_type);
        for (status, set) in node.statuses() {
            if set {
                r.record(sink, "nodes", 1.0, &[node.name.as_str(), node_type, status]);
            }
        }

        for resource in &node.resources {
            record_resource(r, resource, &node.name, sink);
        }
    }
}

/// One `resources` sample per set flag; a resource without any flag set
/// (typically stopped, which the role label already shows) gets a single
/// sample with an empty status.
pub fn record_resource(r: &DescriptorRegistry, resource: &Resource, node_name: &str, sink: &mut dyn MetricSink) {
    let role = resource.role.to_lowercase();
    let managed = resource.managed.to_string();
    let labels = |status: &'static str| [node_name, resource.id.as_str(), role.as_str(), managed.as_str(), status];

    let statuses = resource.statuses();
    if statuses.iter().all(|(_, set)| !set) {
        r.record(sink, "resources", 1.0, &labels(""));
        return;
    }

    for (status, set) in statuses {
        if set {
            r.record(sink, "resources", 1.0, &labels(status));
        }
    }
}

pub fn record_ungrouped_resources(r: &DescriptorRegistry, crm_mon: &CrmMon, sink: &mut dyn MetricSink) {
    for resource in crm_mon.resources.primitives() {
        record_resource(r, resource, "", sink);
    }
}

pub fn record_fail_counts(r: &DescriptorRegistry, crm_mon: &CrmMon, sink: &mut dyn MetricSink) {
    for node in &crm_mon.node_history.node {
        for history in &node.resource_history {
            r.record(
                sink,
                "fail_count",
                fail_count_value(history.fail_count),
                &[node.name.as_str(), history.id.as_str()],
            );
        }
    }
}

pub fn record_migration_thresholds(r: &DescriptorRegistry, crm_mon: &CrmMon, sink: &mut dyn MetricSink) {
    for node in &crm_mon.node_history.node {
        for history in &node.resource_history {
            r.record(
                sink,
                "migration_threshold",
                history.migration_threshold as f64,
                &[node.name.as_str(), history.id.as_str()],
            );
        }
    }
}

/// An unparsable timestamp only drops this metric.
pub fn record_config_last_change(r: &DescriptorRegistry, crm_mon: &CrmMon, sink: &mut dyn MetricSink) {
    match parse_last_change(&crm_mon.summary.last_change.time) {
        Ok(epoch) => r.record(sink, "config_last_change", epoch as f64, &[]),
        Err(e) => warn!(error = %e, "skipping config_last_change"),
    }
}

pub fn record_constraints(r: &DescriptorRegistry, cib: &Cib, sink: &mut dyn MetricSink) {
    for constraint in &cib.configuration.constraints.rsc_location {
        r.record(
            sink,
            "location_constraints",
            constraint_score(&constraint.score),
            &[
                constraint.id.as_str(),
                constraint.node.as_str(),
                constraint.resource.as_str(),
                constraint.role.to_lowercase().as_str(),
            ],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cib::{Configuration, Constraints, LocationConstraint};
    use crate::crmmon::{
        ClusterOptions, CloneSet, Group, LastChange, Node, NodeHistory, NodeHistoryEntry, Nodes,
        ResourceHistory, Resources, Summary,
    };
    use hacluster_metrics::Sample;
    use std::collections::HashSet;
    use tracing_test::traced_test;

    fn run(f: impl FnOnce(&DescriptorRegistry, &mut dyn MetricSink)) -> Vec<Sample> {
        let registry = descriptors();
        let mut sink: Vec<Sample> = Vec::new();
        f(&registry, &mut sink);
        sink
    }

    fn named<'a>(samples: &'a [Sample], short: &str) -> Vec<&'a Sample> {
        let fq = format!("ha_cluster_pacemaker_{short}");
        samples.iter().filter(|s| s.fq_name() == fq).collect()
    }

    fn node(name: &str) -> Node {
        Node {
            name: name.to_string(),
            node_type: "member".to_string(),
            ..Default::default()
        }
    }

    fn resource(id: &str, role: &str) -> Resource {
        Resource {
            id: id.to_string(),
            role: role.to_string(),
            managed: true,
            ..Default::default()
        }
    }

    fn with_nodes(nodes: Vec<Node>) -> CrmMon {
        CrmMon {
            nodes: Nodes { node: nodes },
            ..Default::default()
        }
    }

    #[test]
    fn node_without_flags_emits_nothing() {
        let crm_mon = with_nodes(vec![node("node1")]);
        let samples = run(|r, s| record_nodes(r, &crm_mon, s));
        assert!(samples.is_empty());
    }

    #[test]
    fn node_emits_one_sample_per_set_flag() {
        let mut n = node("node1");
        n.online = true;
        n.expected_up = true;
        n.dc = true;
        let crm_mon = with_nodes(vec![n]);

        let samples = run(|r, s| record_nodes(r, &crm_mon, s));
        let statuses: Vec<_> = samples.iter().map(|s| s.label("status").unwrap()).collect();
        assert_eq!(statuses, ["online", "expected_up", "dc"]);
        for sample in &samples {
            assert_eq!(sample.value(), 1.0);
            assert_eq!(sample.label("node"), Some("node1"));
            assert_eq!(sample.label("type"), Some("member"));
        }
    }

    #[test]
    fn node_with_every_flag_emits_nine_samples() {
        let n = Node {
            name: "node1".to_string(),
            node_type: "ping".to_string(),
            online: true,
            standby: true,
            standby_onfail: true,
            maintenance: true,
            pending: true,
            unclean: true,
            shutdown: true,
            expected_up: true,
            dc: true,
            resources: Vec::new(),
        };
        let crm_mon = with_nodes(vec![n]);

        let samples = run(|r, s| record_nodes(r, &crm_mon, s));
        assert_eq!(samples.len(), 9);
        let statuses: HashSet<_> = samples.iter().map(|s| s.label("status").unwrap()).collect();
        assert_eq!(statuses.len(), 9);
    }

    #[test]
    fn unknown_node_type_is_normalized() {
        let mut n = node("node1");
        n.node_type = "cluster-node".to_string();
        n.online = true;
        let crm_mon = with_nodes(vec![n]);

        let samples = run(|r, s| record_nodes(r, &crm_mon, s));
        assert_eq!(samples[0].label("type"), Some("unknown"));
    }

    #[test]
    fn resource_without_flags_has_empty_status() {
        let samples = run(|r, s| record_resource(r, &resource("rsc_dummy", "Stopped"), "node1", s));

        assert_eq!(samples.len(), 1);
        assert_eq!(
            samples[0].label_values(),
            ["node1", "rsc_dummy", "stopped", "true", ""]
        );
    }

    #[test]
    fn resource_emits_one_sample_per_set_flag() {
        let mut rsc = resource("rsc_SAPHana", "Master");
        rsc.active = true;
        rsc.failed = true;
        rsc.managed = false;

        let samples = run(|r, s| record_resource(r, &rsc, "node1", s));
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label("status"), Some("active"));
        assert_eq!(samples[1].label("status"), Some("failed"));
        assert_eq!(samples[1].label("role"), Some("master"));
        assert_eq!(samples[1].label("managed"), Some("false"));
    }

    #[test]
    fn node_resources_carry_the_node_name() {
        let mut n = node("node2");
        let mut rsc = resource("rsc_ip", "Started");
        rsc.active = true;
        n.resources.push(rsc);
        let crm_mon = with_nodes(vec![n]);

        let samples = run(|r, s| record_nodes(r, &crm_mon, s));
        let resources = named(&samples, "resources");
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].label("node"), Some("node2"));
    }

    #[test]
    fn ungrouped_resources_have_empty_node() {
        let crm_mon = CrmMon {
            resources: Resources {
                resource: vec![resource("rsc_dummy", "Stopped")],
                clone: vec![CloneSet {
                    id: "cln".to_string(),
                    resource: vec![resource("rsc_clone_member", "Stopped")],
                    ..Default::default()
                }],
                group: vec![Group {
                    id: "grp".to_string(),
                    resource: vec![resource("rsc_group_member", "Stopped")],
                }],
            },
            ..Default::default()
        };

        let samples = run(|r, s| record_ungrouped_resources(r, &crm_mon, s));
        let ids: Vec<_> = samples.iter().map(|s| s.label("resource").unwrap()).collect();
        assert_eq!(ids, ["rsc_dummy", "rsc_clone_member", "rsc_group_member"]);
        assert!(samples.iter().all(|s| s.label("node") == Some("")));
    }

    fn with_history(entries: Vec<(&str, &str, i64, i64)>) -> CrmMon {
        let node = entries
            .into_iter()
            .map(|(node, id, fail_count, migration_threshold)| NodeHistoryEntry {
                name: node.to_string(),
                resource_history: vec![ResourceHistory {
                    id: id.to_string(),
                    fail_count,
                    migration_threshold,
                }],
            })
            .collect();
        CrmMon {
            node_history: NodeHistory { node },
            ..Default::default()
        }
    }

    #[test]
    fn fail_count_infinity_sentinel() {
        let crm_mon = with_history(vec![
            ("node1", "rsc_a", 1_000_000, 5000),
            ("node2", "rsc_b", 999_999, 3),
        ]);

        let samples = run(|r, s| record_fail_counts(r, &crm_mon, s));
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].value(), f64::INFINITY);
        assert_eq!(samples[0].label_values(), ["node1", "rsc_a"]);
        assert_eq!(samples[1].value(), 999_999.0);
    }

    #[test]
    fn migration_threshold_passthrough() {
        let crm_mon = with_history(vec![("node1", "rsc_a", 1_000_000, 5000)]);

        let samples = run(|r, s| record_migration_thresholds(r, &crm_mon, s));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value(), 5000.0);
        assert_eq!(samples[0].label_values(), ["node1", "rsc_a"]);
    }

    fn with_summary(time: &str, stonith_enabled: bool) -> CrmMon {
        CrmMon {
            summary: Summary {
                last_change: LastChange {
                    time: time.to_string(),
                },
                cluster_options: ClusterOptions { stonith_enabled },
            },
            ..Default::default()
        }
    }

    #[test]
    fn config_last_change_is_a_counter_in_epoch_seconds() {
        let crm_mon = with_summary("Fri Nov 29 10:57:15 2019", true);

        let samples = run(|r, s| record_config_last_change(r, &crm_mon, s));
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value(), 1_575_025_035.0);
        assert_eq!(samples[0].descriptor().kind(), hacluster_metrics::MetricKind::Counter);
    }

    #[test]
    #[traced_test]
    fn bad_last_change_skips_only_that_metric() {
        let mut n = node("node1");
        n.online = true;
        let mut crm_mon = with_summary("yesterday", true);
        crm_mon.nodes.node.push(n);

        let samples = run(|r, s| project(r, &crm_mon, &Cib::default(), s));
        assert!(named(&samples, "config_last_change").is_empty());
        assert_eq!(named(&samples, "stonith_enabled").len(), 1);
        assert_eq!(named(&samples, "nodes").len(), 1);
        assert!(logs_contain("skipping config_last_change"));
    }

    #[test]
    fn stonith_flag() {
        let enabled = with_summary("", true);
        let disabled = with_summary("", false);

        let samples = run(|r, s| record_stonith(r, &enabled, s));
        assert_eq!(samples[0].value(), 1.0);
        assert!(samples[0].label_values().is_empty());

        let samples = run(|r, s| record_stonith(r, &disabled, s));
        assert_eq!(samples[0].value(), 0.0);
    }

    #[test]
    fn location_constraint_scores() {
        let constraint = |id: &str, score: &str| LocationConstraint {
            id: id.to_string(),
            node: "node1".to_string(),
            resource: "rsc".to_string(),
            role: "Started".to_string(),
            score: score.to_string(),
        };
        let cib = Cib {
            configuration: Configuration {
                constraints: Constraints {
                    rsc_location: vec![
                        constraint("prefer", "INFINITY"),
                        constraint("ban", "-INFINITY"),
                        constraint("weighted", "150"),
                        constraint("broken", "lots"),
                    ],
                },
            },
        };

        let samples = run(|r, s| record_constraints(r, &cib, s));
        let values: Vec<_> = samples.iter().map(|s| s.value()).collect();
        assert_eq!(values, [f64::INFINITY, f64::NEG_INFINITY, 150.0, 0.0]);
        assert_eq!(samples[0].label_values(), ["prefer", "node1", "rsc", "started"]);
    }

    #[test]
    fn projection_order_and_arity() {
        let crm_mon = crate::crmmon::parse_crm_mon(include_bytes!("../tests/fixtures/crm_mon.xml")).unwrap();
        let cib = crate::cib::parse_cib(include_bytes!("../tests/fixtures/cib.xml")).unwrap();

        let samples = run(|r, s| project(r, &crm_mon, &cib, s));

        assert_eq!(samples[0].fq_name(), "ha_cluster_pacemaker_stonith_enabled");
        assert_eq!(
            samples.last().unwrap().fq_name(),
            "ha_cluster_pacemaker_location_constraints"
        );
        for sample in &samples {
            assert_eq!(sample.label_values().len(), sample.descriptor().label_names().len());
            assert!(!sample.value().is_nan());
        }

        // node1: online, expected_up, dc; node2: online, standby, expected_up
        assert_eq!(named(&samples, "nodes").len(), 6);
        // node1: 4 (SAPHana is active and failed), node2: 1, inactive: 3
        assert_eq!(named(&samples, "resources").len(), 8);
        assert_eq!(named(&samples, "fail_count").len(), 3);
        assert_eq!(named(&samples, "location_constraints").len(), 3);
    }
}
