//! Prometheus text exposition format.
//!
//! Renders gathered samples for scraping by a Prometheus server or
//! compatible agent.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use crate::descriptor::Descriptor;
use crate::sample::Sample;

/// Render samples grouped into families.
///
/// Families come out in descriptor order; a family without samples is
/// left out entirely, HELP and TYPE lines included.
pub fn render_prometheus(descriptors: &[Arc<Descriptor>], samples: &[Sample]) -> String {
    let mut by_family: HashMap<&str, Vec<&Sample>> = HashMap::new();
    for sample in samples {
        by_family.entry(sample.fq_name()).or_default().push(sample);
    }

    let mut out = String::new();
    for descriptor in descriptors {
        let Some(family) = by_family.get(descriptor.fq_name()) else {
            continue;
        };

        let _ = writeln!(out, "# HELP {} {}", descriptor.fq_name(), escape_help(descriptor.help()));
        let _ = writeln!(out, "# TYPE {} {}", descriptor.fq_name(), descriptor.kind());

        for sample in family {
            out.push_str(descriptor.fq_name());
            if !descriptor.label_names().is_empty() {
                out.push('{');
                let pairs: Vec<String> = descriptor
                    .label_names()
                    .iter()
                    .zip(sample.label_values())
                    .map(|(name, value)| format!("{name}=\"{}\"", escape_label_value(value)))
                    .collect();
                out.push_str(&pairs.join(","));
                out.push('}');
            }
            let _ = writeln!(out, " {}", format_value(sample.value()));
        }
    }

    out
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        v.to_string()
    }
}

fn escape_label_value(v: &str) -> String {
    v.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}
