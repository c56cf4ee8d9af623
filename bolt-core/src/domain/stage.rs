//! Stage kinds
//!
//! The closed set of application stages a workflow can contain.

use serde::{Deserialize, Serialize};

/// A role a stage plays in the load-testing run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Setup hook run before anything else
    PreStart,

    /// Teardown hook, wired as the workflow exit handler
    PostStop,

    /// Monitoring stage, daemonized alongside load tests
    Monitoring,

    /// Load test coordinator
    LoadTestsMaster,

    /// Load test traffic generator, replicated per worker
    LoadTestsSlave,
}

impl StageKind {
    /// All kinds, in template emission order
    pub const ALL: [StageKind; 5] = [
        StageKind::PreStart,
        StageKind::PostStop,
        StageKind::Monitoring,
        StageKind::LoadTestsMaster,
        StageKind::LoadTestsSlave,
    ];

    /// Template name of this stage in the workflow document
    pub fn template_name(self) -> &'static str {
        match self {
            StageKind::PreStart => "pre-start",
            StageKind::PostStop => "post-stop",
            StageKind::Monitoring => "monitoring",
            StageKind::LoadTestsMaster => "load-tests-master",
            StageKind::LoadTestsSlave => "load-tests-slave",
        }
    }

    /// Lifecycle hooks around the run
    pub fn is_hook(self) -> bool {
        matches!(self, StageKind::PreStart | StageKind::PostStop)
    }

    /// Stages driven by the load test descriptor
    pub fn is_load_test(self) -> bool {
        matches!(self, StageKind::LoadTestsMaster | StageKind::LoadTestsSlave)
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.template_name())
    }
}
