use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, warn};
use rusoto_core::{ByteStream, RusotoError};
use rusoto_s3::{PutObjectRequest, S3Client, S3};
use tokio::time::sleep;

use crate::cloud::client::create_s3_client;
use crate::cloud::gateway::ObjectStoreGateway;
use crate::constants::{MAX_UPLOAD_RETRIES, RETRY_BASE_DELAY_MS, RETRY_MAX_DELAY_SECS};
use crate::error::BoxError;
use crate::models::{DeploymentTarget, Encryption, UploadRequest};

/// Object store gateway backed by Amazon S3.
///
/// Transient failures (dispatch errors, 5xx and throttling responses) are
/// retried with exponential backoff; anything else is handed back to the
/// pipeline on the first attempt.
///
/// # Example
///
/// ```no_run
/// # use artifact_uploader::cloud::s3::S3Gateway;
/// let gateway = S3Gateway::new("us-west-2", Some("deploy")).unwrap();
/// ```
pub struct S3Gateway {
    client: Arc<S3Client>,
    max_attempts: usize,
}

impl S3Gateway {
    /// Create a gateway for the given region, optionally using a named profile
    pub fn new(region_name: &str, profile: Option<&str>) -> Result<Self> {
        Ok(Self::with_client(create_s3_client(region_name, profile)?))
    }

    pub fn with_client(client: Arc<S3Client>) -> Self {
        S3Gateway {
            client,
            max_attempts: MAX_UPLOAD_RETRIES,
        }
    }

    /// Override the number of attempts per object (minimum 1)
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

/// Whether a failed put is worth repeating: the request never reached S3, or
/// S3 answered with a server error or asked us to slow down.
pub fn is_retryable<E>(error: &RusotoError<E>) -> bool {
    match error {
        RusotoError::HttpDispatch(_) => true,
        RusotoError::Unknown(response) => {
            response.status.is_server_error() || response.status.as_u16() == 429
        },
        _ => false,
    }
}

/// Delay before the given retry attempt (1-based)
pub fn retry_delay(attempt: usize) -> Duration {
    let exponent = attempt.min(16) as u32;
    let delay = Duration::from_millis(RETRY_BASE_DELAY_MS.saturating_mul(2u64.pow(exponent)));
    delay.min(Duration::from_secs(RETRY_MAX_DELAY_SECS))
}

/// Translate an upload request into a rusoto put-object request.
///
/// Encryption fields stay `None` unless the request carries a directive.
pub fn to_put_object_request(request: &UploadRequest) -> PutObjectRequest {
    let mut put = PutObjectRequest {
        bucket: request.bucket.clone(),
        key: request.key.clone(),
        body: Some(ByteStream::from(request.body.to_vec())),
        content_length: Some(request.body.len() as i64),
        content_type: Some(request.content_type.clone()),
        metadata: Some(request.metadata.clone()),
        ..Default::default()
    };

    if let Some(encryption) = &request.encryption {
        put.server_side_encryption = encryption.server_side_encryption().map(str::to_string);
        match encryption {
            Encryption::Aes256 => {}
            Encryption::AwsKms { key_id } => {
                put.ssekms_key_id = key_id.clone();
            }
            Encryption::CustomerProvided { algorithm, key, key_md5 } => {
                put.sse_customer_algorithm = Some(algorithm.clone());
                put.sse_customer_key = Some(key.clone());
                put.sse_customer_key_md5 = key_md5.clone();
            }
        }
    }

    put
}

#[async_trait]
impl ObjectStoreGateway for S3Gateway {
    async fn put_object(
        &self,
        request: UploadRequest,
        target: &DeploymentTarget,
    ) -> Result<(), BoxError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            // ByteStream consumes its buffer, so every attempt needs a fresh request
            let put = to_put_object_request(&request);

            match self.client.put_object(put).await {
                Ok(_) => {
                    debug!(
                        "Stored s3://{}/{} ({} bytes) for stage {} in {}",
                        request.bucket,
                        request.key,
                        request.body.len(),
                        target.stage,
                        target.region
                    );
                    return Ok(());
                },
                Err(e) => {
                    if !is_retryable(&e) || attempt >= self.max_attempts {
                        return Err(anyhow!(
                            "S3 rejected s3://{}/{} after {} attempt(s): {}",
                            request.bucket,
                            request.key,
                            attempt,
                            e
                        )
                        .into());
                    }

                    let delay = retry_delay(attempt);
                    warn!("S3 upload attempt {} for {} failed, retrying in {:?}: {}",
                          attempt, request.key, delay, e);
                    sleep(delay).await;
                }
            }
        }
    }
}
