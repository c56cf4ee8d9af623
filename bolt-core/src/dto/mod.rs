//! Data Transfer Objects
//!
//! This module contains DTOs exchanged between the Bolt service, the CLI and
//! the Kubernetes API. DTOs are lightweight views optimized for transfer.

pub mod workflow;
