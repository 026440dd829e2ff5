use std::sync::Arc;

use bytes::Bytes;
use log::{debug, info};
use serde_json::{Map, Value};

#[cfg(test)]
use mockall::automock;

use crate::cloud::gateway::ObjectStoreGateway;
use crate::constants::{TEMPLATE_CONTENT_TYPE, TEMPLATE_FILE_NAME};
use crate::error::{BoxError, UploadError};
use crate::models::{object_key, CompiledTemplate, DeploymentTarget, UploadedObject};
use crate::upload::request::build_upload_request;

/// Turns the raw compiled template into the document that gets stored.
///
/// Implementations must not change the template's meaning; reordering and
/// canonicalizing are fine.
#[cfg_attr(test, automock)]
pub trait TemplateNormalizer: Send + Sync {
    fn normalize(&self, template: &CompiledTemplate) -> Result<CompiledTemplate, BoxError>;
}

/// Sorts object keys recursively. Array order is meaningful and kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalJsonNormalizer;

impl TemplateNormalizer for CanonicalJsonNormalizer {
    fn normalize(&self, template: &CompiledTemplate) -> Result<CompiledTemplate, BoxError> {
        Ok(canonicalize(template))
    }
}

/// Recursively rebuild `value` with object keys in sorted order.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            let mut sorted = Map::new();
            for (key, child) in entries {
                sorted.insert(key.clone(), canonicalize(child));
            }
            Value::Object(sorted)
        },
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// Canonical textual form of a template: compact JSON with sorted keys.
pub fn serialize_template(template: &CompiledTemplate) -> Result<Vec<u8>, UploadError> {
    Ok(serde_json::to_vec(&canonicalize(template))?)
}

/// Key of the compiled template inside an artifact directory
pub fn template_key(artifact_directory: &str) -> String {
    object_key(artifact_directory, TEMPLATE_FILE_NAME)
}

/// Proof that the compiled template is stored.
///
/// Only [`TemplateUploadStep::upload`] creates one, and the artifact phase of
/// the orchestrator cannot start without it.
#[derive(Debug)]
pub struct TemplateUploaded {
    object: UploadedObject,
}

impl TemplateUploaded {
    pub fn object(&self) -> &UploadedObject {
        &self.object
    }

    pub fn into_object(self) -> UploadedObject {
        self.object
    }
}

/// Normalizes, serializes and stores the compiled template.
pub struct TemplateUploadStep {
    gateway: Arc<dyn ObjectStoreGateway>,
    normalizer: Arc<dyn TemplateNormalizer>,
}

impl TemplateUploadStep {
    pub fn new(gateway: Arc<dyn ObjectStoreGateway>, normalizer: Arc<dyn TemplateNormalizer>) -> Self {
        Self { gateway, normalizer }
    }

    pub async fn upload(
        &self,
        target: &DeploymentTarget,
        artifact_directory: &str,
        template: &CompiledTemplate,
    ) -> Result<TemplateUploaded, UploadError> {
        let normalized = self
            .normalizer
            .normalize(template)
            .map_err(UploadError::Normalization)?;
        let body = Bytes::from(serialize_template(&normalized)?);

        let key = template_key(artifact_directory);
        let size_bytes = body.len() as u64;
        let request = build_upload_request(target, key.clone(), body, TEMPLATE_CONTENT_TYPE);
        let content_hash = request.content_hash().unwrap_or_default().to_string();

        debug!("Uploading compiled template to s3://{}/{}", target.bucket_name, key);

        self.gateway
            .put_object(request, target)
            .await
            .map_err(|source| UploadError::Remote { key: key.clone(), source })?;

        info!("Uploaded compiled template ({} bytes)", size_bytes);

        Ok(TemplateUploaded {
            object: UploadedObject {
                key,
                size_bytes,
                content_hash,
            },
        })
    }
}
