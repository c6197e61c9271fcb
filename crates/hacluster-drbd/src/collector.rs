//! The DRBD collector.

use std::path::PathBuf;
use std::sync::Arc;

use hacluster_core::{CommandRunner, SystemCommandRunner, check_executables};
use hacluster_metrics::{Collector, Descriptor, DescriptorRegistry, MetricSink};
use tracing::{debug, warn};

use crate::error::{DrbdError, DrbdResult};
use crate::projection::{self, SUBSYSTEM};
use crate::split_brain::scan_split_brain_dir;
use crate::status::DrbdStatusParser;

/// Reads `drbdsetup status --json` and the split-brain marker directory on
/// every scrape.
pub struct DrbdCollector {
    registry: DescriptorRegistry,
    status: DrbdStatusParser,
    split_brain_dir: PathBuf,
}

impl DrbdCollector {
    /// Fails when `drbdsetup` is missing or not executable. The split-brain
    /// directory is optional and not checked.
    pub fn new(drbdsetup_path: impl Into<PathBuf>, split_brain_dir: impl Into<PathBuf>) -> DrbdResult<Self> {
        let drbdsetup_path = drbdsetup_path.into();
        check_executables(&[&drbdsetup_path]).map_err(DrbdError::Init)?;

        Ok(Self::with_runner(
            drbdsetup_path,
            split_brain_dir,
            Arc::new(SystemCommandRunner),
        ))
    }

    pub fn with_runner(
        drbdsetup_path: impl Into<PathBuf>,
        split_brain_dir: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            registry: projection::descriptors(),
            status: DrbdStatusParser::new(drbdsetup_path, runner),
            split_brain_dir: split_brain_dir.into(),
        }
    }
}

impl Collector for DrbdCollector {
    fn name(&self) -> &str {
        SUBSYSTEM
    }

    fn describe(&self) -> Vec<Arc<Descriptor>> {
        self.registry.descriptors().to_vec()
    }

    fn collect(&self, sink: &mut dyn MetricSink) {
        debug!("collecting drbd metrics");

        let resources = match self.status.parse() {
            Ok(resources) => resources,
            Err(e) => {
                warn!(error = %e, "drbd metrics unavailable");
                return;
            }
        };
        let split_brains = scan_split_brain_dir(&self.split_brain_dir);

        projection::project(&self.registry, &resources, &split_brains, sink);
    }
}
