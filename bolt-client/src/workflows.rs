//! Workflow API endpoints

use bolt_core::argo::ExecutionDocument;
use bolt_core::argo::types::KIND;
use bolt_core::dto::workflow::WorkflowCreated;
use kube::api::{Api, DynamicObject, GroupVersionKind, PostParams};
use kube::discovery::ApiResource;
use tracing::info;

use crate::ArgoClient;
use crate::error::{ClientError, Result};

const WORKFLOWS_GROUP: &str = "argoproj.io";
const WORKFLOWS_VERSION: &str = "v1alpha1";

/// API resource of Argo's `Workflow` custom resource
fn workflow_resource() -> ApiResource {
    ApiResource::from_gvk(&GroupVersionKind::gvk(
        WORKFLOWS_GROUP,
        WORKFLOWS_VERSION,
        KIND,
    ))
}

/// Untyped view of the document for the dynamic API
fn to_dynamic(document: &ExecutionDocument) -> Result<DynamicObject> {
    serde_json::to_value(document)
        .and_then(serde_json::from_value)
        .map_err(|e| ClientError::ParseError(format!("Failed to convert workflow: {}", e)))
}

/// Identifying metadata of a created object
fn created_metadata(object: &DynamicObject) -> Result<WorkflowCreated> {
    serde_json::to_value(&object.metadata)
        .and_then(serde_json::from_value)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse workflow metadata: {}", e)))
}

impl ArgoClient {
    /// Create a workflow in the namespace named by its metadata
    ///
    /// # Arguments
    /// * `document` - The compiled workflow
    ///
    /// # Returns
    /// Identifying metadata of the created workflow
    pub async fn create_workflow(&self, document: &ExecutionDocument) -> Result<WorkflowCreated> {
        let namespace = &document.metadata.namespace;
        info!(
            "Creating workflow {} in namespace {}",
            document.metadata.name, namespace
        );

        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), namespace, &workflow_resource());
        let created = api
            .create(&PostParams::default(), &to_dynamic(document)?)
            .await?;

        created_metadata(&created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bolt_core::argo::types::API_VERSION;
    use bolt_core::domain::workflow::WorkflowRequest;
    use bolt_core::{CompilerConfig, compile};

    fn document() -> ExecutionDocument {
        let request: WorkflowRequest = serde_json::from_value(serde_json::json!({
            "tenant_id": "world-corp",
            "project_id": "test-project",
            "repository_url": "git@bitbucket.org:acaisoft/load-events.git",
            "execution_id": "execution-identifier",
            "auth_token": "some_token",
            "duration_seconds": 123
        }))
        .unwrap();

        compile(&request, &CompilerConfig::default()).unwrap()
    }

    #[test]
    fn test_workflow_resource() {
        let resource = workflow_resource();
        assert_eq!(resource.api_version, API_VERSION);
        assert_eq!(resource.kind, "Workflow");
        assert_eq!(resource.plural, "workflows");
    }

    #[test]
    fn test_to_dynamic_keeps_document() {
        let document = document();
        let object = to_dynamic(&document).unwrap();

        assert_eq!(object.metadata.name.as_deref(), Some(document.metadata.name.as_str()));
        assert_eq!(object.metadata.namespace.as_deref(), Some("argo"));
        assert_eq!(object.types.unwrap().kind, "Workflow");
        assert_eq!(object.data["spec"]["entrypoint"], "main");
    }

    #[test]
    fn test_created_metadata() {
        let object: DynamicObject = serde_json::from_value(serde_json::json!({
            "apiVersion": "argoproj.io/v1alpha1",
            "kind": "Workflow",
            "metadata": {
                "name": "bolt-wf-x1y2z3",
                "namespace": "argo",
                "uid": "abc",
                "resourceVersion": "17",
                "creationTimestamp": "2024-05-01T10:00:00Z"
            },
            "spec": {"entrypoint": "main"}
        }))
        .unwrap();

        let created = created_metadata(&object).unwrap();
        assert_eq!(created.name, "bolt-wf-x1y2z3");
        assert_eq!(created.uid.as_deref(), Some("abc"));
        assert_eq!(created.resource_version.as_deref(), Some("17"));
        assert!(created.creation_timestamp.is_some());
    }
}
