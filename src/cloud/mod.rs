//! Object store integration for deployment uploads.
//!
//! The upload pipeline talks to storage only through the
//! [`gateway::ObjectStoreGateway`] trait. The production implementation
//! stores objects in Amazon S3 through rusoto.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌─────────────────────┐
//! │ Upload steps    │────▶│ ObjectStoreGateway  │
//! └─────────────────┘     └──────────┬──────────┘
//!                                    │
//!                          ┌─────────▼─────────┐
//!                          │    S3Gateway      │
//!                          │ (retry + backoff) │
//!                          └─────────┬─────────┘
//!                                    │
//!                          ┌─────────▼─────────┐
//!                          │ Deployment bucket │
//!                          └───────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```no_run
//! use artifact_uploader::cloud::s3::S3Gateway;
//!
//! # fn example() -> anyhow::Result<()> {
//! let gateway = S3Gateway::new("eu-central-1", None)?;
//! # Ok(())
//! # }
//! ```

/// Remote-call seam used by the upload pipeline
pub mod gateway;

/// Amazon S3 implementation of the gateway
pub mod s3;

/// S3 client construction (region and profile handling)
pub mod client;
