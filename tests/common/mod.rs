//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use artifact_uploader::cloud::gateway::ObjectStoreGateway;
use artifact_uploader::error::BoxError;
use artifact_uploader::models::{DeploymentTarget, Encryption, UploadRequest};
use artifact_uploader::upload::{ArtifactReader, ProgressSink};

/// One call seen by [`RecordingGateway`].
#[derive(Debug, Clone)]
pub struct PutCall {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub encryption: Option<Encryption>,
    pub content_hash: Option<String>,
}

/// Gateway that records every put in call order.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<PutCall>>,
    failing_suffix: Option<String>,
    delays: HashMap<String, Duration>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every key ending with `suffix`
    pub fn failing_on(suffix: &str) -> Self {
        Self {
            failing_suffix: Some(suffix.to_string()),
            ..Self::default()
        }
    }

    /// Hold puts for keys ending with `suffix` for `delay`
    pub fn with_delay(mut self, suffix: &str, delay: Duration) -> Self {
        self.delays.insert(suffix.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<PutCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.key).collect()
    }
}

#[async_trait]
impl ObjectStoreGateway for RecordingGateway {
    async fn put_object(&self, request: UploadRequest, _target: &DeploymentTarget) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(PutCall {
            key: request.key.clone(),
            body: request.body.clone(),
            content_type: request.content_type.clone(),
            encryption: request.encryption.clone(),
            content_hash: request.content_hash().map(str::to_string),
        });

        let delay = self
            .delays
            .iter()
            .find(|(suffix, _)| request.key.ends_with(suffix.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match &self.failing_suffix {
            Some(suffix) if request.key.ends_with(suffix.as_str()) => Err("AccessDenied".into()),
            _ => Ok(()),
        }
    }
}

/// In-memory artifact files.
#[derive(Default)]
pub struct MemoryReader {
    files: HashMap<PathBuf, Bytes>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<Bytes>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    fn get(&self, path: &Path) -> io::Result<Bytes> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

#[async_trait]
impl ArtifactReader for MemoryReader {
    async fn stat_size(&self, path: &Path) -> io::Result<u64> {
        Ok(self.get(path)?.len() as u64)
    }

    async fn read_all(&self, path: &Path) -> io::Result<Bytes> {
        self.get(path)
    }
}

/// Progress sink keeping every line.
#[derive(Default)]
pub struct RecordingProgress {
    lines: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn log(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

pub fn target(encryption: Option<Encryption>) -> DeploymentTarget {
    DeploymentTarget {
        bucket_name: "deploy-bucket".to_string(),
        stage: "dev".to_string(),
        region: "us-east-1".to_string(),
        encryption,
    }
}
