use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::error::BoxError;
use crate::models::{DeploymentTarget, UploadRequest};

/// Remote call used to persist objects in the deployment bucket.
///
/// Implementations own any retry policy; callers treat every error as final.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStoreGateway: Send + Sync {
    /// Store one object. The request is consumed.
    async fn put_object(
        &self,
        request: UploadRequest,
        target: &DeploymentTarget,
    ) -> Result<(), BoxError>;
}
