//! Workflow request domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request to run a load-testing workflow
///
/// Produced by the request layer after schema checks and handed to the
/// compiler read-only. Each optional job descriptor switches its stage on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRequest {
    pub tenant_id: String,
    pub project_id: String,

    pub repository_url: String,
    #[serde(default = "default_branch")]
    pub branch: String,

    pub execution_id: String,
    pub auth_token: String,

    pub duration_seconds: i64,

    #[serde(default)]
    pub job_pre_start: Option<PreStartJob>,
    #[serde(default)]
    pub job_post_stop: Option<PostStopJob>,
    #[serde(default)]
    pub job_monitoring: Option<MonitoringJob>,
    #[serde(default)]
    pub job_load_tests: Option<LoadTestJob>,

    /// Bypass the image build cache
    #[serde(default)]
    pub no_cache: bool,
}

fn default_branch() -> String {
    "master".to_string()
}

/// User-supplied environment for a job, rendered in key order
pub type EnvVars = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreStartJob {
    #[serde(default)]
    pub env_vars: EnvVars,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostStopJob {
    #[serde(default)]
    pub env_vars: EnvVars,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonitoringJob {
    #[serde(default)]
    pub env_vars: EnvVars,
}

/// Load test descriptor
///
/// Fans out into one master and `workers` slaves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadTestJob {
    #[serde(default)]
    pub env_vars: EnvVars,
    pub workers: i64,
    pub users: i64,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<i64>,
}

impl WorkflowRequest {
    /// Returns the user environment for the descriptor backing `kind`, if present
    pub fn env_vars_for(&self, kind: super::stage::StageKind) -> Option<&EnvVars> {
        use super::stage::StageKind;

        match kind {
            StageKind::PreStart => self.job_pre_start.as_ref().map(|j| &j.env_vars),
            StageKind::PostStop => self.job_post_stop.as_ref().map(|j| &j.env_vars),
            StageKind::Monitoring => self.job_monitoring.as_ref().map(|j| &j.env_vars),
            StageKind::LoadTestsMaster | StageKind::LoadTestsSlave => {
                self.job_load_tests.as_ref().map(|j| &j.env_vars)
            }
        }
    }
}
