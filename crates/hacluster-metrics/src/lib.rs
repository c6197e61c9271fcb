//! hacluster-metrics — the metric model shared by every collector.
//!
//! A collector owns a [`DescriptorRegistry`] built once at construction.
//! On each scrape it projects fresh snapshots into [`Sample`]s and pushes
//! them into a [`MetricSink`]; the [`CollectorRegistry`] drives all
//! collectors and renders the result in the Prometheus text format.
//!
//! # Architecture
//!
//! ```text
//! CollectorRegistry
//!   ├── register() ← once per collector at startup
//!   ├── gather() → Vec<Sample>     (one pass over every collector)
//!   └── render() → text/plain for /metrics
//!
//! Collector
//!   ├── DescriptorRegistry (name → help, labels, kind; write-once)
//!   └── collect(&mut dyn MetricSink)
//! ```

pub mod collector;
pub mod descriptor;
pub mod error;
pub mod prometheus;
pub mod sample;

pub use collector::{Collector, CollectorRegistry};
pub use descriptor::{Descriptor, DescriptorRegistry, MetricKind, NAMESPACE};
pub use error::MetricsError;
pub use prometheus::render_prometheus;
pub use sample::{MetricSink, Sample};
