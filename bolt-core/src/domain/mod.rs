//! Core domain types
//!
//! This module contains the domain structures shared by the compiler, the
//! HTTP service and the CLI. A `WorkflowRequest` is the compiler input and a
//! `StageKind` names each role the compiled workflow can contain.

pub mod stage;
pub mod workflow;
