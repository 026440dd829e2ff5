use std::collections::HashMap;

use bytes::Bytes;

use crate::constants::CONTENT_HASH_METADATA_KEY;
use crate::models::{DeploymentTarget, UploadRequest};
use crate::utils::hash::fingerprint;

/// Build a put-object request for `body` stored at `key`.
///
/// The content hash metadata is always set. The encryption directive is copied
/// from the target only when one is configured.
pub fn build_upload_request(
    target: &DeploymentTarget,
    key: impl Into<String>,
    body: Bytes,
    content_type: &str,
) -> UploadRequest {
    let mut metadata = HashMap::new();
    metadata.insert(CONTENT_HASH_METADATA_KEY.to_string(), fingerprint(&body));

    UploadRequest {
        bucket: target.bucket_name.clone(),
        key: key.into(),
        body,
        content_type: content_type.to_string(),
        encryption: target.encryption.clone(),
        metadata,
    }
}
