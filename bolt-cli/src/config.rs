//! Configuration module
//!
//! Compiler settings for the CLI. Flags fall back to the same `BOLT_*`
//! environment variables the service reads.

use anyhow::{Context, Result};
use bolt_core::compiler::{CompilerConfig, NodePools, StageProfiles};
use clap::Args;

/// Compiler overrides shared by every command
#[derive(Debug, Clone, Default, Args)]
pub struct Config {
    /// Namespace the workflow is created in
    #[arg(long, global = true, env = "BOLT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Service account the workflow pods run as
    #[arg(long, global = true, env = "BOLT_SERVICE_ACCOUNT")]
    pub service_account: Option<String>,

    /// Image of the build step
    #[arg(long, global = true, env = "BOLT_BUILDER_IMAGE")]
    pub builder_image: Option<String>,

    /// GCP project of the image registry
    #[arg(long, global = true, env = "BOLT_GCP_PROJECT")]
    pub gcp_project: Option<String>,

    /// Redis used as the build cache
    #[arg(long, global = true, env = "BOLT_REDIS_URL")]
    pub redis_url: Option<String>,

    /// URL stages report progress to
    #[arg(long, global = true, env = "BOLT_CALLBACK_URL")]
    pub callback_url: Option<String>,

    /// Secret holding the ssh key for source checkout
    #[arg(long, global = true, env = "BOLT_SSH_SECRET")]
    pub ssh_secret: Option<String>,

    /// Secret holding the registry credentials
    #[arg(long, global = true, env = "BOLT_REGISTRY_SECRET")]
    pub registry_secret: Option<String>,

    /// Node label selecting the master and worker pools
    #[arg(long, global = true, env = "BOLT_NODE_POOL_LABEL")]
    pub node_pool_label: Option<String>,

    /// Pool running the load test master
    #[arg(long, global = true, env = "BOLT_MASTER_POOL", default_value = "master")]
    pub master_pool: String,

    /// Pool running every other stage
    #[arg(long, global = true, env = "BOLT_WORKER_POOL", default_value = "worker")]
    pub worker_pool: String,

    /// Seconds added to the test duration for each stage deadline
    #[arg(long, global = true, env = "BOLT_DEADLINE_GRACE_SECONDS")]
    pub deadline_grace_seconds: Option<u64>,

    /// JSON file overriding the stage profiles
    #[arg(long, global = true, env = "BOLT_STAGE_PROFILES")]
    pub stage_profiles: Option<String>,
}

impl Config {
    /// Build the compiler configuration from defaults and overrides
    pub fn compiler(&self) -> Result<CompilerConfig> {
        let mut compiler = CompilerConfig::default();

        if let Some(namespace) = &self.namespace {
            compiler.namespace = namespace.clone();
        }
        if let Some(account) = &self.service_account {
            compiler.service_account = account.clone();
        }
        if let Some(image) = &self.builder_image {
            compiler.builder_image = image.clone();
        }
        if let Some(project) = &self.gcp_project {
            compiler.gcp_project = project.clone();
        }
        if let Some(url) = &self.redis_url {
            compiler.redis_url = url.clone();
        }
        if let Some(url) = &self.callback_url {
            compiler.callback_url = url.clone();
        }
        if let Some(secret) = &self.ssh_secret {
            compiler.ssh_secret_name = secret.clone();
        }
        if let Some(secret) = &self.registry_secret {
            compiler.registry_secret_name = secret.clone();
        }
        if let Some(grace) = self.deadline_grace_seconds {
            compiler.deadline_grace_seconds = grace;
        }

        if let Some(label) = &self.node_pool_label {
            compiler.node_pools = Some(NodePools {
                label: label.clone(),
                master: self.master_pool.clone(),
                worker: self.worker_pool.clone(),
            });
        }

        if let Some(path) = &self.stage_profiles {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read stage profiles: {}", path))?;
            compiler.profiles = StageProfiles::from_json(&json)
                .with_context(|| format!("Invalid stage profiles in {}", path))?;
        }

        compiler.validate()?;

        Ok(compiler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: Config,
    }

    #[test]
    fn test_defaults() {
        let config = Config {
            master_pool: "master".to_string(),
            worker_pool: "worker".to_string(),
            ..Default::default()
        };

        assert_eq!(config.compiler().unwrap(), CompilerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config {
            namespace: Some("load".to_string()),
            node_pool_label: Some("bolt/pool".to_string()),
            master_pool: "big".to_string(),
            worker_pool: "small".to_string(),
            deadline_grace_seconds: Some(60),
            ..Default::default()
        };

        let compiler = config.compiler().unwrap();
        assert_eq!(compiler.namespace, "load");
        assert_eq!(compiler.deadline_grace_seconds, 60);
        let pools = compiler.node_pools.unwrap();
        assert_eq!((pools.master.as_str(), pools.worker.as_str()), ("big", "small"));
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let config = Config {
            namespace: Some(String::new()),
            ..Default::default()
        };

        assert!(config.compiler().is_err());
    }

    #[test]
    fn test_invalid_callback_url_rejected() {
        let config = Config {
            callback_url: Some("bolt-api/callbacks".to_string()),
            ..Default::default()
        };

        assert!(config.compiler().is_err());
    }

    #[test]
    fn test_registry_secret_from_env() {
        // SAFETY: no other test reads BOLT_REGISTRY_SECRET
        unsafe { std::env::set_var("BOLT_REGISTRY_SECRET", "registry-creds") };
        let cli = TestCli::try_parse_from(["bolt", "--redis-url", "redis://cache:6379"]).unwrap();
        unsafe { std::env::remove_var("BOLT_REGISTRY_SECRET") };

        let compiler = cli.config.compiler().unwrap();
        assert_eq!(compiler.registry_secret_name, "registry-creds");
        assert_eq!(compiler.redis_url, "redis://cache:6379");
        assert_eq!(compiler.ssh_secret_name, "ssh-files");
    }

    #[test]
    fn test_stage_profiles_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");
        std::fs::write(
            &path,
            r#"{"monitoring": {"image": "eu.gcr.io/acai-bolt/monitor", "command": ["monitor"], "args": [],
                "cpu_request": "100m", "cpu_limit": "200m",
                "memory_request": "64Mi", "memory_limit": "128Mi", "retry_limit": 1}}"#,
        )
        .unwrap();

        let config = Config {
            stage_profiles: Some(path.display().to_string()),
            ..Default::default()
        };

        let compiler = config.compiler().unwrap();
        assert_eq!(compiler.profiles.monitoring.image, "eu.gcr.io/acai-bolt/monitor");
        assert_eq!(compiler.profiles.monitoring.retry_limit, Some(1));
    }
}
