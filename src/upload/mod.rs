//! Upload pipeline for one deployment.
//!
//! ```text
//! config + template ─▶ TemplateUploadStep ─▶ (TemplateUploaded) ─▶ select ─▶ ArtifactUploadStep × N
//! ```
//!
//! The template always lands in the bucket before any code artifact: the
//! artifact phase takes the [`template::TemplateUploaded`] token returned by
//! the template step.
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use artifact_uploader::cloud::s3::S3Gateway;
//! use artifact_uploader::config::PackageConfig;
//! use artifact_uploader::models::DeploymentTarget;
//! use artifact_uploader::upload::upload_artifacts;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let target = DeploymentTarget {
//!     bucket_name: "my-deployment-bucket".to_string(),
//!     stage: "dev".to_string(),
//!     region: "us-east-1".to_string(),
//!     encryption: None,
//! };
//! let package = PackageConfig::new("my-service");
//! let gateway = Arc::new(S3Gateway::new(&target.region, None)?);
//!
//! let report = upload_artifacts(gateway, &target, "serverless/my-service/dev/1", &serde_json::json!({}), &package).await?;
//! println!("stored {} artifacts", report.artifacts.len());
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod orchestrator;
pub mod request;
pub mod selection;
pub mod template;

pub use artifact::{service_progress_message, ArtifactReader, ArtifactUploadStep, LocalFileSystem, LogProgress, ProgressSink};
pub use orchestrator::{upload_artifacts, UploadOrchestrator};
pub use request::build_upload_request;
pub use selection::select;
pub use template::{CanonicalJsonNormalizer, TemplateNormalizer, TemplateUploadStep, TemplateUploaded};
