//! Service configuration
//!
//! Defines the bind address and the compiler settings applied to every
//! workflow, loaded from environment variables with defaults.

use anyhow::Context;
use bolt_core::compiler::{CompilerConfig, NodePools, StageProfiles};

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Settings threaded into every compiled workflow
    pub compiler: CompilerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            compiler: CompilerConfig::default(),
        }
    }
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// Every variable is optional and falls back to its default:
    /// - BOLT_BIND_ADDR (default: 0.0.0.0:8080)
    /// - BOLT_NAMESPACE, BOLT_SERVICE_ACCOUNT (default: argo)
    /// - BOLT_BUILDER_IMAGE, BOLT_GCP_PROJECT, BOLT_REDIS_URL
    /// - BOLT_CALLBACK_URL
    /// - BOLT_SSH_SECRET, BOLT_REGISTRY_SECRET
    /// - BOLT_NODE_POOL_LABEL, BOLT_MASTER_POOL, BOLT_WORKER_POOL
    /// - BOLT_DEADLINE_GRACE_SECONDS (default: 600)
    /// - BOLT_STAGE_PROFILES (path to a JSON stage profile table)
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        let compiler = &mut config.compiler;

        if let Some(addr) = lookup("BOLT_BIND_ADDR") {
            config.bind_addr = addr;
        }

        for (key, field) in [
            ("BOLT_NAMESPACE", &mut compiler.namespace),
            ("BOLT_SERVICE_ACCOUNT", &mut compiler.service_account),
            ("BOLT_BUILDER_IMAGE", &mut compiler.builder_image),
            ("BOLT_GCP_PROJECT", &mut compiler.gcp_project),
            ("BOLT_REDIS_URL", &mut compiler.redis_url),
            ("BOLT_CALLBACK_URL", &mut compiler.callback_url),
            ("BOLT_SSH_SECRET", &mut compiler.ssh_secret_name),
            ("BOLT_REGISTRY_SECRET", &mut compiler.registry_secret_name),
        ] {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }

        if let Some(label) = lookup("BOLT_NODE_POOL_LABEL") {
            let master = lookup("BOLT_MASTER_POOL").unwrap_or_else(|| "master".to_string());
            let worker = lookup("BOLT_WORKER_POOL").unwrap_or_else(|| "worker".to_string());
            compiler.node_pools = Some(NodePools {
                label,
                master,
                worker,
            });
        }

        if let Some(grace) = lookup("BOLT_DEADLINE_GRACE_SECONDS") {
            compiler.deadline_grace_seconds = grace
                .parse()
                .context("BOLT_DEADLINE_GRACE_SECONDS must be a number of seconds")?;
        }

        if let Some(path) = lookup("BOLT_STAGE_PROFILES") {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read stage profiles from {}", path))?;
            compiler.profiles = StageProfiles::from_json(&json)
                .with_context(|| format!("Invalid stage profiles in {}", path))?;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        self.compiler.validate()?;

        Ok(())
    }
}
