//! Bolt Core
//!
//! Core types and the workflow compiler for the Bolt load-testing platform.
//!
//! This crate contains:
//! - Domain types: the workflow request and the stage kinds it selects
//! - Argo types: the typed Argo Workflow document the compiler emits
//! - Compiler: request validation, stage selection, DAG wiring, template
//!   rendering and document assembly
//! - DTOs: data exchanged with the cluster and service callers

pub mod argo;
pub mod compiler;
pub mod domain;
pub mod dto;
pub mod error;

pub use compiler::{CompilerConfig, compile};
pub use error::{CompileError, ConfigurationError, SettingsError};
