use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, info};

use crate::cloud::gateway::ObjectStoreGateway;
use crate::config::PackageConfig;
use crate::constants::DEFAULT_MAX_CONCURRENT_UPLOADS;
use crate::error::UploadError;
use crate::models::{CompiledTemplate, DeploymentTarget, UploadReport, UploadedObject};
use crate::security::validate_object_prefix;
use crate::upload::artifact::{ArtifactReader, ArtifactUploadStep, LocalFileSystem, LogProgress, ProgressSink};
use crate::upload::selection::select;
use crate::upload::template::{CanonicalJsonNormalizer, TemplateNormalizer, TemplateUploadStep, TemplateUploaded};

/// Runs a complete upload pass: the compiled template first, then every
/// selected artifact.
///
/// Artifact uploads run concurrently up to `max_concurrent_uploads`. The first
/// failure to happen ends the pass, even while uploads selected before it are
/// still running, and drops the uploads still in flight; objects that were
/// already stored are left in place. The report lists artifacts in selection
/// order.
pub struct UploadOrchestrator {
    gateway: Arc<dyn ObjectStoreGateway>,
    normalizer: Arc<dyn TemplateNormalizer>,
    reader: Arc<dyn ArtifactReader>,
    progress: Arc<dyn ProgressSink>,
    max_concurrent_uploads: usize,
}

impl UploadOrchestrator {
    pub fn new(gateway: Arc<dyn ObjectStoreGateway>) -> Self {
        UploadOrchestrator {
            gateway,
            normalizer: Arc::new(CanonicalJsonNormalizer),
            reader: Arc::new(LocalFileSystem),
            progress: Arc::new(LogProgress),
            max_concurrent_uploads: DEFAULT_MAX_CONCURRENT_UPLOADS,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Arc<dyn TemplateNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_reader(mut self, reader: Arc<dyn ArtifactReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// `1` uploads artifacts one at a time. Zero is treated as one.
    pub fn with_max_concurrent_uploads(mut self, max_concurrent_uploads: usize) -> Self {
        self.max_concurrent_uploads = max_concurrent_uploads.max(1);
        self
    }

    pub async fn run(
        &self,
        target: &DeploymentTarget,
        artifact_directory: &str,
        template: &CompiledTemplate,
        package: &PackageConfig,
    ) -> Result<UploadReport, UploadError> {
        validate_object_prefix(artifact_directory)
            .map_err(|e| UploadError::invalid_argument(e.to_string()))?;

        info!(
            "Uploading {} to s3://{}/{}",
            package.service_name, target.bucket_name, artifact_directory
        );

        let template_step = TemplateUploadStep::new(self.gateway.clone(), self.normalizer.clone());
        let uploaded = template_step.upload(target, artifact_directory, template).await?;

        let artifacts = self.upload_artifacts(&uploaded, target, artifact_directory, package).await?;

        Ok(UploadReport {
            template: uploaded.into_object(),
            artifacts,
        })
    }

    /// Artifact phase. Requires the template barrier token.
    async fn upload_artifacts(
        &self,
        _template: &TemplateUploaded,
        target: &DeploymentTarget,
        artifact_directory: &str,
        package: &PackageConfig,
    ) -> Result<Vec<UploadedObject>, UploadError> {
        let selected = select(package)?;
        debug!(
            "Selected {} artifact(s), uploading up to {} at a time",
            selected.len(),
            self.max_concurrent_uploads
        );

        let step = ArtifactUploadStep::new(self.gateway.clone(), self.reader.clone(), self.progress.clone());
        let step = &step;

        // Completion order; the first error ends the stream and drops the rest
        let mut uploaded: Vec<(usize, UploadedObject)> = stream::iter(selected.iter().enumerate())
            .map(move |(index, descriptor)| async move {
                let object = step.upload(target, artifact_directory, descriptor).await?;
                Ok::<_, UploadError>((index, object))
            })
            .buffer_unordered(self.max_concurrent_uploads)
            .try_collect()
            .await?;

        uploaded.sort_by_key(|(index, _)| *index);
        Ok(uploaded.into_iter().map(|(_, object)| object).collect())
    }
}

/// Upload the compiled template and the artifacts of `package` with the
/// default collaborators.
pub async fn upload_artifacts(
    gateway: Arc<dyn ObjectStoreGateway>,
    target: &DeploymentTarget,
    artifact_directory: &str,
    template: &CompiledTemplate,
    package: &PackageConfig,
) -> Result<UploadReport, UploadError> {
    UploadOrchestrator::new(gateway)
        .run(target, artifact_directory, template, package)
        .await
}
