use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use rusoto_core::{HttpClient, Region};
use rusoto_s3::S3Client;

/// Parse an AWS region name
pub fn parse_region(region_name: &str) -> Result<Region> {
    region_name
        .parse::<Region>()
        .map_err(|_| anyhow!("Invalid AWS region '{}'", region_name))
}

/// Create an S3 client with the specified region and profile
pub fn create_s3_client(region_name: &str, profile: Option<&str>) -> Result<Arc<S3Client>> {
    let region = parse_region(region_name)?;

    // Create S3 client with profile if specified
    let s3_client = if let Some(profile_name) = profile {
        match rusoto_credential::ProfileProvider::new() {
            Ok(mut provider) => {
                provider.set_profile(profile_name);
                debug!("Using AWS profile '{}' in {}", profile_name, region.name());
                Arc::new(S3Client::new_with(
                    HttpClient::new().context("Failed to create HTTP client")?,
                    provider,
                    region,
                ))
            },
            Err(e) => {
                warn!("Failed to create AWS profile provider: {}, using default", e);
                Arc::new(S3Client::new(region))
            }
        }
    } else {
        Arc::new(S3Client::new(region))
    };

    Ok(s3_client)
}
