//! The collector abstraction and the registry driving a scrape.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::descriptor::Descriptor;
use crate::prometheus::render_prometheus;
use crate::sample::{MetricSink, Sample};

/// A source of metrics re-read on every scrape.
///
/// `collect` must not fail: a collector that cannot read its source logs
/// the problem and emits nothing for this pass.
pub trait Collector: Send + Sync {
    /// Short subsystem name, e.g. `pacemaker`.
    fn name(&self) -> &str;

    /// Every descriptor this collector may emit samples for.
    fn describe(&self) -> Vec<Arc<Descriptor>>;

    fn collect(&self, sink: &mut dyn MetricSink);
}

/// Holds the registered collectors and runs them one after the other.
#[derive(Default)]
pub struct CollectorRegistry {
    collectors: Vec<Box<dyn Collector>>,
    descriptors: Vec<Arc<Descriptor>>,
}

impl CollectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collector.
    ///
    /// # Panics
    ///
    /// Panics if the collector name or any of its metric names is already
    /// taken by a registered collector.
    pub fn register(&mut self, collector: Box<dyn Collector>) {
        assert!(
            !self.collectors.iter().any(|c| c.name() == collector.name()),
            "collector '{}' registered twice",
            collector.name()
        );

        let known: HashSet<&str> = self.descriptors.iter().map(|d| d.fq_name()).collect();
        let new = collector.describe();
        for d in &new {
            assert!(
                !known.contains(d.fq_name()),
                "metric '{}' is already provided by another collector",
                d.fq_name()
            );
        }

        info!(collector = collector.name(), metrics = new.len(), "collector registered");
        self.descriptors.extend(new);
        self.collectors.push(collector);
    }

    pub fn collector_names(&self) -> Vec<&str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Run one collection pass over every collector.
    pub fn gather(&self) -> Vec<Sample> {
        let mut samples: Vec<Sample> = Vec::new();
        for collector in &self.collectors {
            let start = Instant::now();
            let before = samples.len();
            collector.collect(&mut samples as &mut dyn MetricSink);
            debug!(
                collector = collector.name(),
                samples = samples.len() - before,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "collection pass finished"
            );
        }
        samples
    }

    /// Gather and render in the Prometheus text format.
    pub fn render(&self) -> String {
        render_prometheus(&self.descriptors, &self.gather())
    }
}
