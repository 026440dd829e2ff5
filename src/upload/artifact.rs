use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::cloud::gateway::ObjectStoreGateway;
use crate::constants::ARTIFACT_CONTENT_TYPE;
use crate::error::UploadError;
use crate::models::{object_key, ArtifactDescriptor, DeploymentTarget, UploadedObject};
use crate::upload::request::build_upload_request;
use crate::utils::size::format_kilobytes;

/// Read access to local artifact files.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArtifactReader: Send + Sync {
    async fn stat_size(&self, path: &Path) -> std::io::Result<u64>;

    async fn read_all(&self, path: &Path) -> std::io::Result<Bytes>;
}

/// Reads artifacts from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

#[async_trait]
impl ArtifactReader for LocalFileSystem {
    async fn stat_size(&self, path: &Path) -> std::io::Result<u64> {
        Ok(tokio::fs::metadata(path).await?.len())
    }

    async fn read_all(&self, path: &Path) -> std::io::Result<Bytes> {
        // tokio::fs::read closes the handle on every exit path
        Ok(Bytes::from(tokio::fs::read(path).await?))
    }
}

/// Receives human-readable progress lines. Must never fail or block.
#[cfg_attr(test, automock)]
pub trait ProgressSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Forwards progress lines to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn log(&self, message: &str) {
        info!("{}", message);
    }
}

/// Progress line printed before the service artifact is transferred
pub fn service_progress_message(size_bytes: u64) -> String {
    format!("Uploading service .zip file to S3 ({})...", format_kilobytes(size_bytes))
}

/// Reads one artifact and stores it under the artifact directory.
pub struct ArtifactUploadStep {
    gateway: Arc<dyn ObjectStoreGateway>,
    reader: Arc<dyn ArtifactReader>,
    progress: Arc<dyn ProgressSink>,
}

impl ArtifactUploadStep {
    pub fn new(
        gateway: Arc<dyn ObjectStoreGateway>,
        reader: Arc<dyn ArtifactReader>,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self { gateway, reader, progress }
    }

    pub async fn upload(
        &self,
        target: &DeploymentTarget,
        artifact_directory: &str,
        descriptor: &ArtifactDescriptor,
    ) -> Result<UploadedObject, UploadError> {
        if descriptor.source_path.as_os_str().is_empty() {
            return Err(UploadError::invalid_argument(format!(
                "no artifact path given for {}",
                descriptor.kind
            )));
        }
        let file_name = descriptor.file_name().ok_or_else(|| {
            UploadError::invalid_argument(format!(
                "artifact path '{}' for {} has no file name",
                descriptor.source_path.display(),
                descriptor.kind
            ))
        })?;

        let path = descriptor.source_path.as_path();
        let stat_size = self.reader.stat_size(path).await.map_err(|e| io_error(path, e))?;

        if descriptor.kind.is_service() {
            self.progress.log(&service_progress_message(stat_size));
        }

        // The file may change between stat and read; report what was sent
        let body = self.reader.read_all(path).await.map_err(|e| io_error(path, e))?;
        let size_bytes = body.len() as u64;

        let key = object_key(artifact_directory, &file_name);
        let request = build_upload_request(target, key.clone(), body, ARTIFACT_CONTENT_TYPE);
        let content_hash = request.content_hash().unwrap_or_default().to_string();

        debug!("Uploading {} from {} to {}", descriptor.kind, path.display(), key);

        self.gateway
            .put_object(request, target)
            .await
            .map_err(|source| UploadError::Remote { key: key.clone(), source })?;

        Ok(UploadedObject {
            key,
            size_bytes,
            content_hash,
        })
    }
}

fn io_error(path: &Path, source: std::io::Error) -> UploadError {
    UploadError::Io {
        path: PathBuf::from(path),
        source,
    }
}
