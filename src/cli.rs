use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DeployConfig;
use crate::constants::DEFAULT_CONFIG_FILE;
use crate::models::Encryption;

/// Command-line arguments for the artifact uploader.
///
/// Provider options given here override the values from the configuration
/// file.
#[derive(Parser, Debug)]
#[clap(name = "artifact-uploader", about = "Upload a compiled template and its code artifacts to S3")]
pub struct Args {
    /// Path to the deployment configuration YAML file
    #[clap(short = 'c', long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// S3 bucket receiving the deployment objects
    #[clap(short, long)]
    pub bucket: Option<String>,

    /// Deployment stage
    #[clap(short, long)]
    pub stage: Option<String>,

    /// AWS region of the bucket
    #[clap(long)]
    pub region: Option<String>,

    /// AWS profile to use for S3 uploads
    #[clap(long)]
    pub profile: Option<String>,

    /// Enable S3-managed server-side encryption when none is configured
    #[clap(long)]
    pub encrypt: bool,

    /// Compiled template to upload
    #[clap(short, long)]
    pub template: Option<PathBuf>,

    /// Fixed artifact directory (default: {prefix}/{service}/{stage}/{timestamp})
    #[clap(long)]
    pub artifact_directory: Option<String>,

    /// Number of artifacts uploaded at the same time
    #[clap(long)]
    pub max_concurrent_uploads: Option<usize>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a sample configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },

    /// Print the object keys an upload would write, without uploading
    Plan,
}

impl Args {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_overrides(&self, config: &mut DeployConfig) {
        if let Some(bucket) = &self.bucket {
            config.provider.bucket = bucket.clone();
        }
        if let Some(stage) = &self.stage {
            config.provider.stage = stage.clone();
        }
        if let Some(region) = &self.region {
            config.provider.region = region.clone();
        }
        if let Some(profile) = &self.profile {
            config.provider.profile = Some(profile.clone());
        }
        if self.encrypt && config.provider.encryption.is_none() {
            config.provider.encryption = Some(Encryption::Aes256);
        }
        if let Some(template) = &self.template {
            config.template_path = Some(template.clone());
        }
        if let Some(directory) = &self.artifact_directory {
            config.artifact_directory = Some(directory.clone());
        }
        if let Some(max) = self.max_concurrent_uploads {
            config.max_concurrent_uploads = max;
        }
    }
}
