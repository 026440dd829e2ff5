use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::CONTENT_HASH_METADATA_KEY;

/// Compiled infrastructure template as produced by the packaging step.
pub type CompiledTemplate = serde_json::Value;

/// Where a deployment's objects are stored.
///
/// Built once from resolved configuration and passed by reference to every
/// step; nothing mutates it while a deployment runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub bucket_name: String,
    pub stage: String,
    pub region: String,
    pub encryption: Option<Encryption>,
}

/// Server-side encryption applied to uploaded objects.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Encryption {
    /// S3-managed keys
    #[serde(rename = "AES256")]
    Aes256,
    /// KMS-managed keys, optionally with an explicit key id
    #[serde(rename = "aws:kms")]
    AwsKms {
        #[serde(default)]
        key_id: Option<String>,
    },
    /// Customer-provided keys (SSE-C)
    #[serde(rename = "customer")]
    CustomerProvided {
        algorithm: String,
        key: String,
        #[serde(default)]
        key_md5: Option<String>,
    },
}

impl Encryption {
    /// Value of the `x-amz-server-side-encryption` header, if this mode uses it.
    pub fn server_side_encryption(&self) -> Option<&'static str> {
        match self {
            Encryption::Aes256 => Some("AES256"),
            Encryption::AwsKms { .. } => Some("aws:kms"),
            Encryption::CustomerProvided { .. } => None,
        }
    }
}

impl fmt::Debug for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encryption::Aes256 => f.write_str("Aes256"),
            Encryption::AwsKms { key_id } => f.debug_struct("AwsKms").field("key_id", key_id).finish(),
            Encryption::CustomerProvided { algorithm, key_md5, .. } => f
                .debug_struct("CustomerProvided")
                .field("algorithm", algorithm)
                .field("key", &"<REDACTED>")
                .field("key_md5", key_md5)
                .finish(),
        }
    }
}

/// Which part of the service an artifact packages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The single artifact shared by every non-individually packaged function
    Service,
    Function(String),
    Layer(String),
}

impl ArtifactKind {
    pub fn is_service(&self) -> bool {
        matches!(self, ArtifactKind::Service)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Service => write!(f, "service"),
            ArtifactKind::Function(name) => write!(f, "function '{}'", name),
            ArtifactKind::Layer(name) => write!(f, "layer '{}'", name),
        }
    }
}

/// One local file selected for upload.
///
/// Carries no size: the upload step reads the file and reports the number of
/// bytes actually sent in [`UploadedObject::size_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    pub kind: ArtifactKind,
    pub source_path: PathBuf,
}

impl ArtifactDescriptor {
    pub fn new(kind: ArtifactKind, source_path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            source_path: source_path.into(),
        }
    }

    /// Base name of the source file, which becomes the last key segment.
    pub fn file_name(&self) -> Option<String> {
        file_name_of(&self.source_path)
    }
}

pub(crate) fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Joins the artifact directory and an object name into a bucket key.
pub fn object_key(artifact_directory: &str, name: &str) -> String {
    format!("{}/{}", artifact_directory.trim_end_matches('/'), name)
}

/// A fully specified put-object request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    /// Absent when the target has no encryption configured
    pub encryption: Option<Encryption>,
    pub metadata: HashMap<String, String>,
}

impl UploadRequest {
    pub fn content_hash(&self) -> Option<&str> {
        self.metadata.get(CONTENT_HASH_METADATA_KEY).map(String::as_str)
    }
}

/// Receipt for a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedObject {
    pub key: String,
    pub size_bytes: u64,
    pub content_hash: String,
}

/// Outcome of a complete upload pass, in upload order.
#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub template: UploadedObject,
    pub artifacts: Vec<UploadedObject>,
}

impl UploadReport {
    pub fn total_bytes(&self) -> u64 {
        self.template.size_bytes + self.artifacts.iter().map(|a| a.size_bytes).sum::<u64>()
    }
}
