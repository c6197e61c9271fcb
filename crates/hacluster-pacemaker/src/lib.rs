//! hacluster-pacemaker — Pacemaker metrics for the HA cluster exporter.
//!
//! On every scrape the collector runs `crm_mon` (cluster status) and
//! `cibadmin` (configuration), then projects the two snapshots into the
//! `ha_cluster_pacemaker_*` metric families.
//!
//! # Architecture
//!
//! ```text
//! PacemakerCollector::collect()
//!   ├── CrmMonParser::parse() → CrmMon    (nodes, resources, history)
//!   ├── CibParser::parse()    → Cib       (location constraints)
//!   └── projection::project() → samples into the MetricSink
//! ```
//!
//! A failure of either tool drops the whole Pacemaker pass for that scrape.

pub mod cib;
pub mod collector;
pub mod crmmon;
pub mod decode;
pub mod error;
pub mod projection;

pub use cib::{Cib, CibParser, parse_cib};
pub use collector::PacemakerCollector;
pub use crmmon::{CrmMon, CrmMonParser, parse_crm_mon};
pub use error::{PacemakerError, PacemakerResult};
