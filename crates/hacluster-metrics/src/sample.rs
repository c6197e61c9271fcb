//! Metric samples and the sink they are emitted into.

use std::sync::Arc;

use crate::descriptor::Descriptor;

/// One concrete emission: a value plus label values ordered like the
/// descriptor's label names.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    descriptor: Arc<Descriptor>,
    value: f64,
    label_values: Vec<String>,
}

impl Sample {
    pub(crate) fn new(descriptor: Arc<Descriptor>, value: f64, label_values: Vec<String>) -> Self {
        Self {
            descriptor,
            value,
            label_values,
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn fq_name(&self) -> &str {
        self.descriptor.fq_name()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label_values(&self) -> &[String] {
        &self.label_values
    }

    /// Label value by label name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.descriptor
            .label_names()
            .iter()
            .position(|l| l == name)
            .map(|idx| self.label_values[idx].as_str())
    }
}

/// Destination for samples produced during a collection pass.
pub trait MetricSink {
    fn push(&mut self, sample: Sample);
}

impl MetricSink for Vec<Sample> {
    fn push(&mut self, sample: Sample) {
        Vec::push(self, sample);
    }
}
