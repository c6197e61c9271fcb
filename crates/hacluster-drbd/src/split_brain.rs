//! Split-brain markers.
//!
//! DRBD does not report split brains in `drbdsetup status`. Clusters that
//! want them exported install a `split-brain` handler which touches
//! `drbd-split-brain-detected-<resource>-<volume>` in a shared directory;
//! each such file is one marker.

use std::path::Path;

use tracing::debug;

pub const SPLIT_BRAIN_PREFIX: &str = "drbd-split-brain-detected-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitBrainMarker {
    pub resource: String,
    pub volume: String,
}

/// Decode a marker file name; anything not shaped
/// `<prefix><resource>-<volume>` yields `None`.
pub fn parse_marker_name(file_name: &str) -> Option<SplitBrainMarker> {
    let rest = file_name.strip_prefix(SPLIT_BRAIN_PREFIX)?;
    let parts: Vec<&str> = rest.split('-').collect();
    match parts.as_slice() {
        [resource, volume] => Some(SplitBrainMarker {
            resource: resource.to_string(),
            volume: volume.to_string(),
        }),
        _ => None,
    }
}

/// List the markers in `dir`, sorted by file name.
///
/// A missing or unreadable directory means no markers.
pub fn scan_split_brain_dir(dir: &Path) -> Vec<SplitBrainMarker> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %dir.display(), error = %e, "split brain directory not readable");
            return Vec::new();
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();

    names.iter().filter_map(|name| parse_marker_name(name)).collect()
}
