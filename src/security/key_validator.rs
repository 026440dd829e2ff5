//! Validation of bucket names and object key prefixes.

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BUCKET_NAME: Regex = Regex::new(r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$").unwrap();
    static ref IPV4_ADDRESS: Regex = Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap();
}

/// Validates an S3 bucket name against the DNS-compatible naming rules.
pub fn validate_bucket_name(name: &str) -> Result<()> {
    if !BUCKET_NAME.is_match(name) {
        bail!(
            "Invalid bucket name '{}': use 3-63 lowercase letters, digits, dots or hyphens, starting and ending with a letter or digit",
            name
        );
    }
    if name.contains("..") {
        bail!("Invalid bucket name '{}': consecutive dots are not allowed", name);
    }
    if IPV4_ADDRESS.is_match(name) {
        bail!("Invalid bucket name '{}': must not be formatted as an IP address", name);
    }
    Ok(())
}

/// Validates the directory part of object keys.
///
/// Rejects empty prefixes, absolute prefixes, empty segments, `.` or `..`
/// segments, backslashes and null bytes. A single trailing slash is allowed.
pub fn validate_object_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        bail!("Artifact directory must not be empty");
    }
    if prefix.starts_with('/') {
        bail!("Artifact directory '{}' must not start with '/'", prefix);
    }
    if prefix.contains('\0') {
        bail!("Artifact directory contains null bytes");
    }
    if prefix.contains('\\') {
        bail!("Artifact directory '{}' must use '/' as separator", prefix);
    }

    for segment in prefix.trim_end_matches('/').split('/') {
        match segment {
            "" => bail!("Artifact directory '{}' contains an empty segment", prefix),
            "." | ".." => bail!("Path traversal attempt detected in artifact directory '{}'", prefix),
            _ => {}
        }
    }

    Ok(())
}
