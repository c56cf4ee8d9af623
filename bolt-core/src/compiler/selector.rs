//! Stage selection
//!
//! Decides which stages a request compiles into, from the presence of its
//! optional job descriptors.

use std::collections::BTreeSet;

use crate::domain::stage::StageKind;
use crate::domain::workflow::WorkflowRequest;
use crate::error::ConfigurationError;

/// Stages included in one compilation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageSelection {
    kinds: BTreeSet<StageKind>,
    slaves: u32,
}

impl StageSelection {
    pub fn contains(&self, kind: StageKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Number of load test slave replicas
    pub fn slave_count(&self) -> u32 {
        self.slaves
    }

    pub fn has_load_tests(&self) -> bool {
        self.contains(StageKind::LoadTestsMaster)
    }

    /// Selected kinds in template emission order
    pub fn kinds(&self) -> impl Iterator<Item = StageKind> + '_ {
        self.kinds.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Select the stages of a request
///
/// The slave template is selected with the master even for zero workers;
/// it is simply never instantiated as a task.
pub fn select(request: &WorkflowRequest) -> Result<StageSelection, ConfigurationError> {
    let mut selection = StageSelection::default();

    if request.job_pre_start.is_some() {
        selection.kinds.insert(StageKind::PreStart);
    }
    if request.job_post_stop.is_some() {
        selection.kinds.insert(StageKind::PostStop);
    }
    if request.job_monitoring.is_some() {
        selection.kinds.insert(StageKind::Monitoring);
    }
    if let Some(load_tests) = &request.job_load_tests {
        selection.kinds.insert(StageKind::LoadTestsMaster);
        selection.kinds.insert(StageKind::LoadTestsSlave);
        selection.slaves = u32::try_from(load_tests.workers)
            .map_err(|_| ConfigurationError::NegativeWorkers(load_tests.workers))?;
    }

    Ok(selection)
}
