//! Test utilities shared by the unit tests.

#![cfg(test)]

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory that is automatically cleaned up
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Writes `content` to `name` inside a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the file is needed.
pub fn create_temp_artifact(name: &str, content: &[u8]) -> Result<(TempDir, PathBuf)> {
    let dir = create_temp_dir()?;
    let path = dir.path().join(name);
    fs::write(&path, content)?;
    Ok((dir, path))
}

/// Writes a minimal deployment config into `dir` and returns its path
pub fn create_test_config(dir: &TempDir) -> Result<PathBuf> {
    let path = dir.path().join("deploy.yaml");
    fs::write(
        &path,
        r#"
provider:
  bucket: deploy-bucket
  stage: test
package:
  service_name: svc
  package_path: .serverless
  functions:
    - name: first
      individually: true
"#,
    )?;
    Ok(path)
}
