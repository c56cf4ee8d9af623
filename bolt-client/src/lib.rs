//! Bolt Argo Client
//!
//! A small, type-safe client that creates compiled workflows as Argo
//! `Workflow` custom resources through the Kubernetes API.
//!
//! Both the HTTP service and the CLI submit through this crate, behind the
//! [`WorkflowSubmitter`] trait so callers can swap in fakes.
//!
//! # Example
//!
//! ```no_run
//! use bolt_client::ArgoClient;
//! use bolt_core::{CompilerConfig, compile};
//! # use bolt_core::domain::workflow::WorkflowRequest;
//!
//! # async fn example(request: WorkflowRequest) -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArgoClient::try_default().await?;
//!
//! let document = compile(&request, &CompilerConfig::default())?;
//! let created = client.create_workflow(&document).await?;
//!
//! println!("Created workflow: {}", created.name);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod submitter;
mod workflows;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use submitter::WorkflowSubmitter;

use std::path::Path;

use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing::info;

/// Client for the Argo workflows API
#[derive(Clone)]
pub struct ArgoClient {
    client: kube::Client,
}

impl ArgoClient {
    /// Wrap an existing Kubernetes client
    pub fn new(client: kube::Client) -> Self {
        Self { client }
    }

    /// Connect with the inferred cluster configuration
    ///
    /// Uses the pod's service account when running in a cluster, otherwise
    /// the kubeconfig (`$KUBECONFIG` or `~/.kube/config`).
    pub async fn try_default() -> Result<Self> {
        let client = kube::Client::try_default()
            .await
            .map_err(|e| ClientError::Config(format!("Failed to create Kubernetes client: {}", e)))?;

        info!("Kubernetes client ready");
        Ok(Self::new(client))
    }

    /// Connect with the current context of a specific kubeconfig file
    pub async fn from_kubeconfig(path: &Path) -> Result<Self> {
        let config = kubeconfig(path).await?;
        let client = kube::Client::try_from(config)
            .map_err(|e| ClientError::Config(format!("Failed to create Kubernetes client: {}", e)))?;

        info!("Kubernetes client ready from {}", path.display());
        Ok(Self::new(client))
    }
}

async fn kubeconfig(path: &Path) -> Result<kube::Config> {
    let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
        ClientError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;

    kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
        .await
        .map_err(|e| ClientError::Config(format!("Invalid kubeconfig {}: {}", path.display(), e)))
}
