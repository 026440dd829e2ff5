use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::ARTIFACT_EXTENSION;
use crate::error::UploadError;

/// How a function's code reaches the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackagingMode {
    /// Bundled into the service-wide artifact
    Shared,
    /// Uploaded from its own archive
    Individual(PathBuf),
}

/// Packaging settings of the service and each of its functions and layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    pub service_name: String,
    /// Package every function individually unless a function opts out
    #[serde(default)]
    pub individually: bool,
    /// Prebuilt service artifact; defaults to `{package_path}/{service_name}.zip`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    /// Directory holding the archives produced by the packaging step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_path: Option<PathBuf>,
    /// Functions in declaration order
    #[serde(default)]
    pub functions: Vec<FunctionPackage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<LayerPackage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionPackage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individually: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
    /// Container image reference; image functions have no code archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl FunctionPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_artifact(mut self, artifact: impl Into<PathBuf>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    pub fn with_individually(mut self, individually: bool) -> Self {
        self.individually = Some(individually);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerPackage {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<PathBuf>,
}

impl PackageConfig {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Resolve how a function is packaged.
    ///
    /// Returns `None` for image-based functions. An explicit artifact always
    /// wins over the service and function `individually` flags.
    pub fn function_mode(&self, function: &FunctionPackage) -> Result<Option<PackagingMode>, UploadError> {
        if function.image.is_some() {
            return Ok(None);
        }

        if let Some(artifact) = &function.artifact {
            let what = format!("function '{}'", function.name);
            return Ok(Some(PackagingMode::Individual(explicit_path(artifact, &what)?)));
        }

        let individually = function.individually.unwrap_or(self.individually);
        if individually {
            let what = format!("function '{}'", function.name);
            let path = self.generated_artifact_path(&function.name, &what)?;
            return Ok(Some(PackagingMode::Individual(path)));
        }

        Ok(Some(PackagingMode::Shared))
    }

    /// Path of the artifact shared by all `Shared` functions
    pub fn service_artifact_path(&self) -> Result<PathBuf, UploadError> {
        match &self.artifact {
            Some(artifact) => explicit_path(artifact, "the service"),
            None => self.generated_artifact_path(&self.service_name, "the service"),
        }
    }

    pub fn layer_artifact_path(&self, layer: &LayerPackage) -> Result<PathBuf, UploadError> {
        let what = format!("layer '{}'", layer.name);
        match &layer.artifact {
            Some(artifact) => explicit_path(artifact, &what),
            None => self.generated_artifact_path(&layer.name, &what),
        }
    }

    fn generated_artifact_path(&self, name: &str, what: &str) -> Result<PathBuf, UploadError> {
        if name.is_empty() {
            return Err(UploadError::configuration(format!(
                "{} needs a generated artifact but has no name",
                what
            )));
        }

        let package_path = self.package_path.as_ref().ok_or_else(|| {
            UploadError::configuration(format!(
                "{} is packaged without an explicit artifact and no package_path is configured",
                what
            ))
        })?;

        Ok(package_path.join(format!("{}.{}", name, ARTIFACT_EXTENSION)))
    }
}

fn explicit_path(artifact: &Path, what: &str) -> Result<PathBuf, UploadError> {
    if artifact.as_os_str().is_empty() {
        return Err(UploadError::configuration(format!(
            "artifact path for {} is empty",
            what
        )));
    }
    Ok(artifact.to_path_buf())
}
