//! Decides which local archives an upload pass transfers.
//!
//! Individually packaged functions come first in declaration order, then
//! layers, then the shared service artifact. Per-function archives are
//! usually small, so a broken one fails the pass before the large shared
//! transfer starts.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::config::{PackageConfig, PackagingMode};
use crate::constants::TEMPLATE_FILE_NAME;
use crate::error::UploadError;
use crate::models::{ArtifactDescriptor, ArtifactKind};

/// Ordered list of artifacts to upload for `package`.
pub fn select(package: &PackageConfig) -> Result<Vec<ArtifactDescriptor>, UploadError> {
    let mut individual = Vec::new();
    let mut needs_service = package.functions.is_empty() && !package.individually;

    for function in &package.functions {
        match package.function_mode(function)? {
            None => debug!("Function {} is deployed from an image, no artifact", function.name),
            Some(PackagingMode::Shared) => needs_service = true,
            Some(PackagingMode::Individual(path)) => {
                individual.push(ArtifactDescriptor::new(ArtifactKind::Function(function.name.clone()), path));
            },
        }
    }

    for layer in &package.layers {
        let path = package.layer_artifact_path(layer)?;
        individual.push(ArtifactDescriptor::new(ArtifactKind::Layer(layer.name.clone()), path));
    }

    let service_path = if needs_service {
        Some(package.service_artifact_path()?)
    } else {
        None
    };

    let mut seen: HashSet<PathBuf> = service_path.iter().map(|path| lexical_path(path)).collect();
    let mut selected = Vec::with_capacity(individual.len() + 1);
    for descriptor in individual {
        if seen.insert(lexical_path(&descriptor.source_path)) {
            selected.push(descriptor);
        } else {
            debug!(
                "{} shares {} with an artifact already selected",
                descriptor.kind,
                descriptor.source_path.display()
            );
        }
    }
    if let Some(path) = service_path {
        selected.push(ArtifactDescriptor::new(ArtifactKind::Service, path));
    }

    check_key_collisions(&selected)?;
    Ok(selected)
}

/// `path` without `.` components, so `./dist/a.zip` and `dist/a.zip` compare
/// equal. Purely lexical: no filesystem access, `..` is kept.
fn lexical_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// Every selected artifact must map to its own object key, and none may
/// replace the compiled template.
fn check_key_collisions(selected: &[ArtifactDescriptor]) -> Result<(), UploadError> {
    let mut names: HashMap<String, &ArtifactDescriptor> = HashMap::new();

    for descriptor in selected {
        let name = descriptor.file_name().ok_or_else(|| {
            UploadError::configuration(format!(
                "artifact path '{}' for {} has no file name",
                descriptor.source_path.display(),
                descriptor.kind
            ))
        })?;

        if name == TEMPLATE_FILE_NAME {
            return Err(UploadError::configuration(format!(
                "artifact '{}' for {} would overwrite the compiled template",
                descriptor.source_path.display(),
                descriptor.kind
            )));
        }

        if let Some(previous) = names.insert(name.clone(), descriptor) {
            return Err(UploadError::configuration(format!(
                "{} ({}) and {} ({}) would both be stored as '{}'",
                previous.kind,
                previous.source_path.display(),
                descriptor.kind,
                descriptor.source_path.display(),
                name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FunctionPackage, LayerPackage};

    fn package() -> PackageConfig {
        PackageConfig {
            package_path: Some(PathBuf::from(".serverless")),
            ..PackageConfig::new("svc")
        }
    }

    fn paths(selected: &[ArtifactDescriptor]) -> Vec<PathBuf> {
        selected.iter().map(|d| d.source_path.clone()).collect()
    }

    #[test]
    fn test_no_functions_selects_service_only() {
        let selected = select(&package()).unwrap();
        assert_eq!(selected, vec![ArtifactDescriptor::new(ArtifactKind::Service, ".serverless/svc.zip")]);
    }

    #[test]
    fn test_shared_functions_select_service_once() {
        let config = PackageConfig {
            functions: vec![FunctionPackage::new("a"), FunctionPackage::new("b")],
            ..package()
        };
        assert_eq!(paths(&select(&config).unwrap()), vec![PathBuf::from(".serverless/svc.zip")]);
    }

    #[test]
    fn test_individual_service_without_shared_functions_skips_service() {
        let config = PackageConfig {
            individually: true,
            functions: vec![FunctionPackage::new("a"), FunctionPackage::new("b")],
            ..package()
        };
        let selected = select(&config).unwrap();
        assert_eq!(
            paths(&selected),
            vec![PathBuf::from(".serverless/a.zip"), PathBuf::from(".serverless/b.zip")]
        );
        assert!(selected.iter().all(|d| !d.kind.is_service()));
    }

    #[test]
    fn test_layers_before_service() {
        let config = PackageConfig {
            functions: vec![FunctionPackage::new("a")],
            layers: vec![LayerPackage { name: "deps".to_string(), artifact: None }],
            ..package()
        };
        let selected = select(&config).unwrap();
        assert_eq!(selected[0].kind, ArtifactKind::Layer("deps".to_string()));
        assert_eq!(selected[1].kind, ArtifactKind::Service);
    }

    #[test]
    fn test_image_functions_are_skipped() {
        let config = PackageConfig {
            individually: true,
            functions: vec![FunctionPackage::new("img").with_image("repo/app:1")],
            ..package()
        };
        assert!(select(&config).unwrap().is_empty());
    }

    #[test]
    fn test_function_on_service_path_folds_into_service() {
        let config = PackageConfig {
            functions: vec![
                FunctionPackage::new("a").with_artifact(".serverless/svc.zip"),
                FunctionPackage::new("b"),
            ],
            ..package()
        };
        let selected = select(&config).unwrap();
        assert_eq!(selected, vec![ArtifactDescriptor::new(ArtifactKind::Service, ".serverless/svc.zip")]);
    }

    #[test]
    fn test_lexical_path_drops_current_dir() {
        assert_eq!(lexical_path(Path::new("./.serverless/./svc.zip")), PathBuf::from(".serverless/svc.zip"));
        assert_eq!(lexical_path(Path::new("../build/svc.zip")), PathBuf::from("../build/svc.zip"));
    }

    #[test]
    fn test_dot_prefixed_service_path_folds_into_service() {
        let config = PackageConfig {
            functions: vec![
                FunctionPackage::new("a").with_artifact("./.serverless/svc.zip"),
                FunctionPackage::new("b"),
            ],
            ..package()
        };
        let selected = select(&config).unwrap();
        assert_eq!(selected, vec![ArtifactDescriptor::new(ArtifactKind::Service, ".serverless/svc.zip")]);
    }

    #[test]
    fn test_template_name_collision_rejected() {
        let config = PackageConfig {
            functions: vec![FunctionPackage::new("a").with_artifact("build/compiled-cloudformation-template.json")],
            ..package()
        };
        let err = select(&config).unwrap_err();
        assert!(matches!(err, UploadError::Configuration(_)));
        assert!(err.to_string().contains("compiled template"));
    }

    #[test]
    fn test_missing_file_name_rejected() {
        let config = PackageConfig {
            functions: vec![FunctionPackage::new("a").with_artifact("build/..")],
            ..package()
        };
        assert!(matches!(select(&config), Err(UploadError::Configuration(_))));
    }
}
