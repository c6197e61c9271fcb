//! The Pacemaker collector.

use std::path::PathBuf;
use std::sync::Arc;

use hacluster_core::{CommandRunner, SystemCommandRunner, check_executables};
use hacluster_metrics::{Collector, Descriptor, DescriptorRegistry, MetricSink};
use tracing::{debug, warn};

use crate::cib::CibParser;
use crate::crmmon::CrmMonParser;
use crate::error::{PacemakerError, PacemakerResult};
use crate::projection::{self, SUBSYSTEM};

/// Reads `crm_mon` and `cibadmin` on every scrape.
///
/// Both tools must answer for the pass to emit anything; a failure of
/// either one is logged and the collector contributes no samples.
pub struct PacemakerCollector {
    registry: DescriptorRegistry,
    crm_mon: CrmMonParser,
    cib: CibParser,
}

impl PacemakerCollector {
    /// Create a collector spawning the real tools.
    ///
    /// Fails when either binary is missing or not executable.
    pub fn new(crm_mon_path: impl Into<PathBuf>, cibadmin_path: impl Into<PathBuf>) -> PacemakerResult<Self> {
        let crm_mon_path = crm_mon_path.into();
        let cibadmin_path = cibadmin_path.into();
        check_executables(&[&crm_mon_path, &cibadmin_path]).map_err(PacemakerError::Init)?;

        Ok(Self::with_runner(
            crm_mon_path,
            cibadmin_path,
            Arc::new(SystemCommandRunner),
        ))
    }

    /// Create a collector on top of an arbitrary command runner, skipping
    /// the executable checks.
    pub fn with_runner(
        crm_mon_path: impl Into<PathBuf>,
        cibadmin_path: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            registry: projection::descriptors(),
            crm_mon: CrmMonParser::new(crm_mon_path, runner.clone()),
            cib: CibParser::new(cibadmin_path, runner),
        }
    }
}

impl Collector for PacemakerCollector {
    fn name(&self) -> &str {
        SUBSYSTEM
    }

    fn describe(&self) -> Vec<Arc<Descriptor>> {
        self.registry.descriptors().to_vec()
    }

    fn collect(&self, sink: &mut dyn MetricSink) {
        debug!("collecting pacemaker metrics");

        let crm_mon = match self.crm_mon.parse() {
            Ok(crm_mon) => crm_mon,
            Err(e) => {
                warn!(error = %e, "pacemaker metrics unavailable");
                return;
            }
        };

        let cib = match self.cib.parse() {
            Ok(cib) => cib,
            Err(e) => {
                warn!(error = %e, "pacemaker metrics unavailable");
                return;
            }
        };

        projection::project(&self.registry, &crm_mon, &cib, sink);
    }
}
