//! Workflow DTOs exchanged between the service, the CLI and the cluster

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifying metadata of a workflow created in the cluster
///
/// Mirrors the subset of Kubernetes `ObjectMeta` the caller cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowCreated {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_meta() {
        let created: WorkflowCreated = serde_json::from_value(serde_json::json!({
            "name": "bolt-wf-abc123",
            "namespace": "argo",
            "uid": "1f0c1a9e-3c1d-4a43-9d36-2f1d1b8c7f00",
            "resourceVersion": "4242",
            "creationTimestamp": "2024-05-01T10:00:00Z",
            "generation": 1,
            "annotations": {"bolt/tenant-id": "world-corp"}
        }))
        .unwrap();

        assert_eq!(created.name, "bolt-wf-abc123");
        assert_eq!(created.namespace.as_deref(), Some("argo"));
        assert_eq!(created.resource_version.as_deref(), Some("4242"));
        assert!(created.creation_timestamp.is_some());
    }
}
