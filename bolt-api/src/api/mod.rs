//! API Module
//!
//! HTTP API layer for the workflow service.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod workflow;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use bolt_client::WorkflowSubmitter;
use bolt_core::CompilerConfig;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CompilerConfig>,
    pub submitter: Arc<dyn WorkflowSubmitter>,
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health-check", get(health::health_check))
        // Workflow endpoints
        .route("/workflows", post(workflow::create_workflow))
        .route("/workflows/compile", post(workflow::compile_workflow))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::workflow_service::tests::FakeSubmitter;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(submitter: FakeSubmitter) -> Router {
        create_router(AppState {
            config: Arc::new(CompilerConfig::default()),
            submitter: Arc::new(submitter),
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn request_body() -> Value {
        json!({
            "tenant_id": "world-corp",
            "project_id": "test-project",
            "repository_url": "git@bitbucket.org:acaisoft/load-events.git",
            "execution_id": "execution-identifier",
            "auth_token": "some_token",
            "duration_seconds": 123,
            "job_post_stop": {},
            "job_load_tests": { "workers": 2, "users": 10 }
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = app(FakeSubmitter::default())
            .oneshot(
                Request::builder()
                    .uri("/health-check")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_create_workflow() {
        let response = app(FakeSubmitter::default())
            .oneshot(post_json("/workflows", request_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["name"].as_str().unwrap().starts_with("bolt-wf-"));
        assert_eq!(body["namespace"], "argo");
    }

    #[tokio::test]
    async fn test_invalid_request_is_bad_request() {
        let mut body = request_body();
        body["job_load_tests"]["workers"] = json!(-1);

        let response = app(FakeSubmitter::default())
            .oneshot(post_json("/workflows", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_submission_failure_is_bad_gateway() {
        let submitter = FakeSubmitter {
            fail_with: Some(500),
            ..Default::default()
        };

        let response = app(submitter)
            .oneshot(post_json("/workflows", request_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_compile_does_not_submit() {
        let submitter = Arc::new(FakeSubmitter::default());
        let router = create_router(AppState {
            config: Arc::new(CompilerConfig::default()),
            submitter: submitter.clone(),
        });

        let response = router
            .oneshot(post_json("/workflows/compile", request_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = json_body(response).await;
        assert_eq!(document["kind"], "Workflow");
        assert_eq!(document["spec"]["onExit"], "post-stop");
        assert!(submitter.submitted.lock().unwrap().is_empty());
    }
}
