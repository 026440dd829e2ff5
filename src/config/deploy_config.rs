use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::cloud::client::parse_region;
use crate::config::env_vars::expand_path;
use crate::config::package_config::{FunctionPackage, PackageConfig};
use crate::constants::{
    DEFAULT_DEPLOYMENT_PREFIX, DEFAULT_MAX_CONCURRENT_UPLOADS, DEFAULT_REGION, DEFAULT_STAGE,
    LOCAL_TEMPLATE_FILE_NAME, MAX_CONCURRENT_UPLOADS_ENV,
};
use crate::models::{DeploymentTarget, Encryption};
use crate::security::{validate_bucket_name, validate_object_prefix};

fn default_stage() -> String {
    DEFAULT_STAGE.to_string()
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_deployment_prefix() -> String {
    DEFAULT_DEPLOYMENT_PREFIX.to_string()
}

fn default_max_concurrent_uploads() -> usize {
    DEFAULT_MAX_CONCURRENT_UPLOADS
}

/// Provider section: where and how objects are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub bucket: String,
    #[serde(default = "default_stage")]
    pub stage: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Named AWS profile used for credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encryption: Option<Encryption>,
    #[serde(default = "default_deployment_prefix")]
    pub deployment_prefix: String,
}

/// Complete configuration of one deployment upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    pub provider: ProviderConfig,
    pub package: PackageConfig,
    /// Compiled template; defaults to the file written into `package.package_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,
    /// Fixed artifact directory; generated per run when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_directory: Option<String>,
    #[serde(default = "default_max_concurrent_uploads")]
    pub max_concurrent_uploads: usize,
}

impl DeployConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_yaml_str(&content)?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML config")
    }

    /// Save configuration to a YAML file
    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Configuration written by `init-config`
    pub fn sample() -> Self {
        DeployConfig {
            provider: ProviderConfig {
                bucket: "my-deployment-bucket".to_string(),
                stage: default_stage(),
                region: default_region(),
                profile: None,
                encryption: Some(Encryption::Aes256),
                deployment_prefix: default_deployment_prefix(),
            },
            package: PackageConfig {
                package_path: Some(PathBuf::from(".serverless")),
                functions: vec![
                    FunctionPackage::new("api"),
                    FunctionPackage::new("worker").with_individually(true),
                ],
                ..PackageConfig::new("my-service")
            },
            template_path: None,
            artifact_directory: None,
            max_concurrent_uploads: default_max_concurrent_uploads(),
        }
    }

    pub fn create_sample_config_file(path: &Path) -> Result<()> {
        Self::sample().save_to_yaml_file(path)
    }

    /// Expand environment variables in every configured path and apply
    /// environment overrides.
    pub fn process_environment_variables(&mut self) -> Result<()> {
        let package = &mut self.package;
        package.artifact = package.artifact.as_deref().map(expand_path);
        package.package_path = package.package_path.as_deref().map(expand_path);
        for function in &mut package.functions {
            function.artifact = function.artifact.as_deref().map(expand_path);
        }
        for layer in &mut package.layers {
            layer.artifact = layer.artifact.as_deref().map(expand_path);
        }
        self.template_path = self.template_path.as_deref().map(expand_path);

        if let Ok(value) = std::env::var(MAX_CONCURRENT_UPLOADS_ENV) {
            self.max_concurrent_uploads = value.trim().parse().with_context(|| {
                format!("{} must be a positive integer, got '{}'", MAX_CONCURRENT_UPLOADS_ENV, value)
            })?;
            debug!("Upload concurrency set to {} from environment", self.max_concurrent_uploads);
        }

        Ok(())
    }

    /// Check the values the upload cannot run without
    pub fn validate(&self) -> Result<()> {
        validate_bucket_name(&self.provider.bucket)?;
        parse_region(&self.provider.region)?;

        if self.provider.stage.trim().is_empty() {
            bail!("provider.stage must not be empty");
        }
        if self.package.service_name.trim().is_empty() {
            bail!("package.service_name must not be empty");
        }
        if self.max_concurrent_uploads == 0 {
            bail!("max_concurrent_uploads must be at least 1");
        }
        if let Some(directory) = &self.artifact_directory {
            validate_object_prefix(directory)?;
        } else {
            validate_object_prefix(&self.provider.deployment_prefix)?;
        }

        Ok(())
    }

    pub fn target(&self) -> DeploymentTarget {
        DeploymentTarget {
            bucket_name: self.provider.bucket.clone(),
            stage: self.provider.stage.clone(),
            region: self.provider.region.clone(),
            encryption: self.provider.encryption.clone(),
        }
    }

    /// Location of the compiled template on disk
    pub fn template_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.template_path {
            return Ok(path.clone());
        }
        match &self.package.package_path {
            Some(package_path) => Ok(package_path.join(LOCAL_TEMPLATE_FILE_NAME)),
            None => bail!("No template_path configured and no package.package_path to look in"),
        }
    }

    /// Artifact directory for a run started at `now`.
    ///
    /// `{deployment_prefix}/{service}/{stage}/{epoch millis}-{ISO 8601}` unless
    /// a fixed directory is configured.
    pub fn artifact_directory_name(&self, now: DateTime<Utc>) -> String {
        if let Some(directory) = &self.artifact_directory {
            return directory.trim_end_matches('/').to_string();
        }

        format!(
            "{}/{}/{}/{}-{}",
            self.provider.deployment_prefix.trim_end_matches('/'),
            self.package.service_name,
            self.provider.stage,
            now.timestamp_millis(),
            now.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }
}

/// Load a configuration file, expand environment variables and validate it
pub fn load_config(path: &Path) -> Result<DeployConfig> {
    let mut config = DeployConfig::from_yaml_file(path)?;
    config.process_environment_variables()?;
    config.validate()
        .context(format!("Invalid configuration in {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::test_utils::{create_temp_dir, create_test_config};

    const MINIMAL: &str = r#"
provider:
  bucket: deploy-bucket
package:
  service_name: svc
  package_path: .serverless
"#;

    #[test]
    fn test_defaults_applied() {
        let config = DeployConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.provider.stage, "dev");
        assert_eq!(config.provider.region, "us-east-1");
        assert_eq!(config.provider.deployment_prefix, "serverless");
        assert_eq!(config.provider.encryption, None);
        assert_eq!(config.max_concurrent_uploads, DEFAULT_MAX_CONCURRENT_UPLOADS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_target_carries_encryption() {
        let yaml = r#"
provider:
  bucket: deploy-bucket
  stage: prod
  region: eu-west-1
  encryption:
    type: AES256
package:
  service_name: svc
"#;
        let target = DeployConfig::from_yaml_str(yaml).unwrap().target();
        assert_eq!(target.bucket_name, "deploy-bucket");
        assert_eq!(target.stage, "prod");
        assert_eq!(target.region, "eu-west-1");
        assert_eq!(target.encryption, Some(Encryption::Aes256));
    }

    #[test]
    fn test_artifact_directory_name_generated() {
        let config = DeployConfig::from_yaml_str(MINIMAL).unwrap();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(
            config.artifact_directory_name(now),
            "serverless/svc/dev/1700000000000-2023-11-14T22:13:20.000Z"
        );
    }

    #[test]
    fn test_artifact_directory_name_fixed() {
        let mut config = DeployConfig::from_yaml_str(MINIMAL).unwrap();
        config.artifact_directory = Some("releases/v1/".to_string());
        assert_eq!(config.artifact_directory_name(Utc::now()), "releases/v1");
    }

    #[test]
    fn test_template_path_defaults_to_package_path() {
        let config = DeployConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(
            config.template_path().unwrap(),
            PathBuf::from(".serverless/cloudformation-template-update-stack.json")
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = DeployConfig::from_yaml_str(MINIMAL).unwrap();
        config.provider.bucket = "Bad_Bucket".to_string();
        assert!(config.validate().is_err());

        let mut config = DeployConfig::from_yaml_str(MINIMAL).unwrap();
        config.max_concurrent_uploads = 0;
        assert!(config.validate().is_err());

        let mut config = DeployConfig::from_yaml_str(MINIMAL).unwrap();
        config.artifact_directory = Some("../escape".to_string());
        assert!(config.validate().is_err());

        let mut config = DeployConfig::from_yaml_str(MINIMAL).unwrap();
        config.provider.region = "mars-north-1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sample_is_valid() {
        assert!(DeployConfig::sample().validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = create_temp_dir().unwrap();
        let path = create_test_config(&dir).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.provider.stage, "test");
        assert_eq!(config.package.functions[0].individually, Some(true));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = create_temp_dir().unwrap();
        let path = dir.path().join("deploy.yaml");

        DeployConfig::create_sample_config_file(&path).unwrap();
        let reloaded = DeployConfig::from_yaml_file(&path).unwrap();
        assert_eq!(reloaded, DeployConfig::sample());
    }
}
