//! Stage profiles
//!
//! Per-stage image, command, resources and retry figures, kept as data so
//! deployments can tune them without touching the compiler.

use serde::{Deserialize, Serialize};

use crate::argo::types::{ResourceList, ResourceRequirements};
use crate::domain::stage::StageKind;

/// Image reference resolved by Argo to the image built in the same run
pub const BUILT_IMAGE: &str = "{{workflow.outputs.parameters.image}}";

/// Execution profile of one stage kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProfile {
    pub image: String,
    #[serde(default)]
    pub command: Vec<String>,
    #[serde(default)]
    pub args: Vec<String>,
    pub cpu_request: String,
    pub cpu_limit: String,
    pub memory_request: String,
    pub memory_limit: String,
    /// Bounded retry count, `None` disables retries
    #[serde(default)]
    pub retry_limit: Option<u32>,
}

impl StageProfile {
    fn new(role: &str, cpu: (&str, &str), memory: (&str, &str), retry_limit: Option<u32>) -> Self {
        Self {
            image: BUILT_IMAGE.to_string(),
            command: vec!["bolt-run".to_string()],
            args: vec![role.to_string()],
            cpu_request: cpu.0.to_string(),
            cpu_limit: cpu.1.to_string(),
            memory_request: memory.0.to_string(),
            memory_limit: memory.1.to_string(),
            retry_limit,
        }
    }

    pub fn resources(&self) -> ResourceRequirements {
        ResourceRequirements {
            requests: ResourceList {
                cpu: self.cpu_request.clone(),
                memory: self.memory_request.clone(),
            },
            limits: ResourceList {
                cpu: self.cpu_limit.clone(),
                memory: self.memory_limit.clone(),
            },
        }
    }
}

/// Lookup table from stage kind to its profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct StageProfiles {
    pub pre_start: StageProfile,
    pub post_stop: StageProfile,
    pub monitoring: StageProfile,
    pub load_tests_master: StageProfile,
    pub load_tests_slave: StageProfile,
}

impl StageProfiles {
    pub fn get(&self, kind: StageKind) -> &StageProfile {
        match kind {
            StageKind::PreStart => &self.pre_start,
            StageKind::PostStop => &self.post_stop,
            StageKind::Monitoring => &self.monitoring,
            StageKind::LoadTestsMaster => &self.load_tests_master,
            StageKind::LoadTestsSlave => &self.load_tests_slave,
        }
    }

    /// Parse a profile table from JSON; kinds left out keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for StageProfiles {
    fn default() -> Self {
        Self {
            pre_start: StageProfile::new("pre-start", ("100m", "500m"), ("128Mi", "256Mi"), None),
            post_stop: StageProfile::new("post-stop", ("100m", "500m"), ("128Mi", "256Mi"), None),
            monitoring: StageProfile::new(
                "monitoring",
                ("250m", "500m"),
                ("256Mi", "512Mi"),
                Some(3),
            ),
            // A restarted master loses its coordination state
            load_tests_master: StageProfile::new(
                "load-tests-master",
                ("500m", "1000m"),
                ("512Mi", "1Gi"),
                None,
            ),
            load_tests_slave: StageProfile::new(
                "load-tests-slave",
                ("1000m", "2000m"),
                ("1Gi", "2Gi"),
                Some(3),
            ),
        }
    }
}
