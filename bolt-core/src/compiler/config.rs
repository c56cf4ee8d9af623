//! Compiler configuration
//!
//! Deployment-specific values threaded into every compiled workflow:
//! target namespace, builder image, secrets, callback endpoint and the
//! stage profile table.

use serde::{Deserialize, Serialize};

use super::profile::StageProfiles;
use crate::error::SettingsError;

/// Settings shared by all compilations of a process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Namespace the workflow is created in
    pub namespace: String,

    /// Service account the workflow pods run as
    pub service_account: String,

    /// Image of the build stage
    pub builder_image: String,

    /// GCP project used by the build stage for the registry
    pub gcp_project: String,

    /// Redis used by the build stage for image caching
    pub redis_url: String,

    /// Endpoint stages report their state to
    pub callback_url: String,

    /// Secret holding the ssh key for source checkout
    pub ssh_secret_name: String,

    /// Secret holding the registry credentials
    pub registry_secret_name: String,

    /// Node pool placement, when the cluster has dedicated pools
    pub node_pools: Option<NodePools>,

    /// Slack added to the requested duration for stage deadlines
    pub deadline_grace_seconds: u64,

    pub profiles: StageProfiles,
}

/// Node pools separating the load test master from generated traffic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePools {
    /// Node label selecting the pool
    pub label: String,

    /// Pool for the load test master
    pub master: String,

    /// Pool for slaves and hooks
    pub worker: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            namespace: "argo".to_string(),
            service_account: "argo".to_string(),
            builder_image: "eu.gcr.io/acai-bolt/argo-builder".to_string(),
            gcp_project: "acai-bolt".to_string(),
            redis_url: "redis://redis-master.redis.svc.cluster.local".to_string(),
            callback_url: "http://bolt-api.bolt.svc.cluster.local/callbacks".to_string(),
            ssh_secret_name: "ssh-files".to_string(),
            registry_secret_name: "kaniko-secret".to_string(),
            node_pools: None,
            deadline_grace_seconds: 600,
            profiles: StageProfiles::default(),
        }
    }
}

impl CompilerConfig {
    /// Checks the settings every binary relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, value) in [
            ("namespace", &self.namespace),
            ("service_account", &self.service_account),
            ("builder_image", &self.builder_image),
            ("ssh_secret_name", &self.ssh_secret_name),
            ("registry_secret_name", &self.registry_secret_name),
        ] {
            if value.is_empty() {
                return Err(SettingsError::EmptySetting(name));
            }
        }

        if !self.callback_url.starts_with("http://") && !self.callback_url.starts_with("https://")
        {
            return Err(SettingsError::InvalidCallbackUrl(self.callback_url.clone()));
        }

        if let Some(pools) = &self.node_pools {
            for (name, value) in [
                ("node_pools.label", &pools.label),
                ("node_pools.master", &pools.master),
                ("node_pools.worker", &pools.worker),
            ] {
                if value.is_empty() {
                    return Err(SettingsError::EmptySetting(name));
                }
            }
        }

        Ok(())
    }

    /// Enables node pool placement
    pub fn with_node_pools(
        mut self,
        label: impl Into<String>,
        master: impl Into<String>,
        worker: impl Into<String>,
    ) -> Self {
        self.node_pools = Some(NodePools {
            label: label.into(),
            master: master.into(),
            worker: worker.into(),
        });
        self
    }
}
