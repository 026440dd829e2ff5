//! Global constants for the artifact uploader.
//!
//! This module centralizes the well-known object names, media types and
//! tuning values shared by the upload pipeline and the S3 gateway.

// Object naming
/// File name of the compiled template inside the artifact directory.
/// No code artifact may share this name.
pub const TEMPLATE_FILE_NAME: &str = "compiled-cloudformation-template.json";

/// File name the packaging step writes the compiled template to locally
pub const LOCAL_TEMPLATE_FILE_NAME: &str = "cloudformation-template-update-stack.json";

/// Extension of generated function, layer and service archives
pub const ARTIFACT_EXTENSION: &str = "zip";

/// Default first segment of generated artifact directories
pub const DEFAULT_DEPLOYMENT_PREFIX: &str = "serverless";

// Request metadata
/// Metadata key carrying the content fingerprint of every uploaded object
pub const CONTENT_HASH_METADATA_KEY: &str = "content-hash";

/// Media type of the compiled template
pub const TEMPLATE_CONTENT_TYPE: &str = "application/json";

/// Media type of code artifacts
pub const ARTIFACT_CONTENT_TYPE: &str = "application/zip";

// Concurrency
/// Default number of artifact uploads in flight at once
pub const DEFAULT_MAX_CONCURRENT_UPLOADS: usize = 3;

/// Environment variable overriding the artifact upload concurrency
pub const MAX_CONCURRENT_UPLOADS_ENV: &str = "ARTIFACT_UPLOAD_MAX_CONCURRENCY";

// Timeout and retry constants (S3 gateway only)
/// Maximum put-object attempts made by the S3 gateway
pub const MAX_UPLOAD_RETRIES: usize = 3;

/// Base retry delay in milliseconds
pub const RETRY_BASE_DELAY_MS: u64 = 250;

/// Maximum retry delay in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 30;

// Provider defaults
pub const DEFAULT_STAGE: &str = "dev";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_CONFIG_FILE: &str = "deploy.yaml";

