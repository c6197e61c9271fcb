//! Metric descriptors and the per-collector descriptor registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::error;

use crate::error::MetricsError;
use crate::sample::{MetricSink, Sample};

/// Prefix shared by every exported metric name.
pub const NAMESPACE: &str = "ha_cluster";

/// Prometheus metric type of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable metadata for one metric family.
///
/// The label-name list fixes both the arity and the order of the label
/// values every sample of this family must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    fq_name: String,
    help: String,
    label_names: Vec<String>,
    kind: MetricKind,
}

impl Descriptor {
    pub fn new(fq_name: impl Into<String>, help: impl Into<String>, label_names: &[&str], kind: MetricKind) -> Self {
        Self {
            fq_name: fq_name.into(),
            help: help.into(),
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
            kind,
        }
    }

    /// Fully-qualified name, e.g. `ha_cluster_pacemaker_nodes`.
    pub fn fq_name(&self) -> &str {
        &self.fq_name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }
}

/// Descriptor table for one collector subsystem.
///
/// Filled during collector construction and only read afterwards; metric
/// names are looked up by their short form (`nodes`, `fail_count`, ...).
#[derive(Debug, Clone)]
pub struct DescriptorRegistry {
    subsystem: String,
    descriptors: Vec<Arc<Descriptor>>,
    by_name: HashMap<String, usize>,
}

impl DescriptorRegistry {
    pub fn new(subsystem: &str) -> Self {
        Self {
            subsystem: subsystem.to_string(),
            descriptors: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a metric family.
    ///
    /// # Panics
    ///
    /// Panics when `name` was already registered in this subsystem.
    pub fn register(&mut self, name: &str, help: &str, label_names: &[&str], kind: MetricKind) -> Arc<Descriptor> {
        assert!(
            !self.by_name.contains_key(name),
            "metric '{name}' registered twice in subsystem '{}'",
            self.subsystem
        );

        let fq_name = format!("{NAMESPACE}_{}_{name}", self.subsystem);
        let descriptor = Arc::new(Descriptor::new(fq_name, help, label_names, kind));
        self.by_name.insert(name.to_string(), self.descriptors.len());
        self.descriptors.push(descriptor.clone());
        descriptor
    }

    pub fn gauge(&mut self, name: &str, help: &str, label_names: &[&str]) -> Arc<Descriptor> {
        self.register(name, help, label_names, MetricKind::Gauge)
    }

    pub fn counter(&mut self, name: &str, help: &str, label_names: &[&str]) -> Arc<Descriptor> {
        self.register(name, help, label_names, MetricKind::Counter)
    }

    pub fn describe(&self, name: &str) -> Option<&Arc<Descriptor>> {
        self.by_name.get(name).map(|&idx| &self.descriptors[idx])
    }

    /// All descriptors in registration order.
    pub fn descriptors(&self) -> &[Arc<Descriptor>] {
        &self.descriptors
    }

    /// Build a sample after checking the name and label arity.
    pub fn sample(&self, name: &str, value: f64, label_values: &[&str]) -> Result<Sample, MetricsError> {
        let descriptor = self
            .describe(name)
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))?;

        let expected = descriptor.label_names().len();
        if expected != label_values.len() {
            return Err(MetricsError::LabelArity {
                name: descriptor.fq_name().to_string(),
                expected,
                actual: label_values.len(),
            });
        }

        Ok(Sample::new(
            descriptor.clone(),
            value,
            label_values.iter().map(|v| v.to_string()).collect(),
        ))
    }

    /// Build a sample and push it into `sink`.
    ///
    /// Invalid samples are logged and dropped so the rest of the pass goes on.
    pub fn record(&self, sink: &mut dyn MetricSink, name: &str, value: f64, label_values: &[&str]) {
        match self.sample(name, value, label_values) {
            Ok(sample) => sink.push(sample),
            Err(e) => error!(error = %e, subsystem = %self.subsystem, "dropping invalid sample"),
        }
    }
}
