//! # artifact_uploader
//!
//! Uploads a compiled infrastructure template and the code artifacts of a
//! serverless service to an S3 deployment bucket.
//!
//! ## Overview
//!
//! One upload pass stores the compiled template under a well-known key and
//! then every archive the packaging configuration selects: individually
//! packaged functions, layers and finally the shared service archive. Each
//! object carries a `content-hash` metadata entry so downstream tooling can
//! detect changes.
//!
//! ## Features
//!
//! - **Template first**: artifacts are only uploaded once the template is stored
//! - **Mixed packaging**: shared service archive, per-function archives or both
//! - **Server-side encryption**: SSE-S3, SSE-KMS and SSE-C directives
//! - **Bounded concurrency**: artifact uploads run in parallel up to a limit
//! - **YAML configuration**: with environment variable expansion
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use artifact_uploader::cloud::s3::S3Gateway;
//! use artifact_uploader::config::load_config;
//! use artifact_uploader::upload::UploadOrchestrator;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = load_config(Path::new("deploy.yaml"))?;
//! let target = config.target();
//! let gateway = Arc::new(S3Gateway::new(&target.region, config.provider.profile.as_deref())?);
//!
//! let template = serde_json::json!({"Resources": {}});
//! let report = UploadOrchestrator::new(gateway)
//!     .with_max_concurrent_uploads(config.max_concurrent_uploads)
//!     .run(&target, "serverless/my-service/dev/1", &template, &config.package)
//!     .await?;
//!
//! println!("Uploaded {} artifacts", report.artifacts.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`models`]: Deployment target, descriptors, requests and receipts
//! - [`error`]: Error taxonomy of the upload pipeline
//! - [`upload`]: Template step, artifact selection, artifact step, orchestrator
//! - [`config`]: Deployment and packaging configuration
//! - [`cloud`]: Object store gateway and its S3 implementation
//! - [`utils`]: Fingerprinting and size formatting
//! - [`security`]: Bucket/key validation and credential scrubbing
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Core data models and structures used throughout the application
pub mod models;

/// Errors produced by the upload pipeline
pub mod error;

/// Template and artifact upload pipeline
pub mod upload;

/// Utility functions for hashing and size formatting
pub mod utils;

/// Object store integration (S3)
pub mod cloud;

/// Deployment and packaging configuration
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Security utilities for key validation and credential protection
pub mod security;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
