//! hacluster-drbd — DRBD metrics for the HA cluster exporter.
//!
//! Projects `drbdsetup status --json` plus the split-brain marker files
//! into the `ha_cluster_drbd_*` metric families.
//!
//! # Architecture
//!
//! ```text
//! DrbdCollector::collect()
//!   ├── DrbdStatusParser::parse() → Vec<DrbdResource>
//!   ├── scan_split_brain_dir()    → Vec<SplitBrainMarker>
//!   └── projection::project()     → samples into the MetricSink
//! ```

pub mod collector;
pub mod error;
pub mod projection;
pub mod split_brain;
pub mod status;

pub use collector::DrbdCollector;
pub use error::{DrbdError, DrbdResult};
pub use split_brain::{SplitBrainMarker, parse_marker_name, scan_split_brain_dir};
pub use status::{DrbdResource, DrbdStatusParser, parse_drbd_status};
