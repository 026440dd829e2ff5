use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

/// Expand Unix-style environment variables (`${VAR}` and `$VAR`).
///
/// An unset `${VAR}` expands to nothing; an unset `$VAR` is left as written.
pub fn expand_env_vars(input: &str) -> String {
    if !input.contains('$') {
        return input.to_string();
    }

    ENV_VAR_PATTERN
        .replace_all(input, |caps: &Captures| {
            if let Some(braced) = caps.get(1) {
                std::env::var(braced.as_str()).unwrap_or_default()
            } else {
                let bare = &caps[2];
                std::env::var(bare).unwrap_or_else(|_| caps[0].to_string())
            }
        })
        .into_owned()
}

/// Expand environment variables in a path
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_env_vars(&path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braced_variable() {
        std::env::set_var("ARTIFACT_UPLOADER_TEST_BUILD_DIR", "/tmp/build");
        assert_eq!(
            expand_env_vars("${ARTIFACT_UPLOADER_TEST_BUILD_DIR}/svc.zip"),
            "/tmp/build/svc.zip"
        );
    }

    #[test]
    fn test_bare_variable() {
        std::env::set_var("ARTIFACT_UPLOADER_TEST_STAGE", "prod");
        assert_eq!(expand_env_vars("dist/$ARTIFACT_UPLOADER_TEST_STAGE/app.zip"), "dist/prod/app.zip");
    }

    #[test]
    fn test_unset_variables() {
        std::env::remove_var("ARTIFACT_UPLOADER_TEST_UNSET");
        assert_eq!(expand_env_vars("a/${ARTIFACT_UPLOADER_TEST_UNSET}b"), "a/b");
        assert_eq!(
            expand_env_vars("a/$ARTIFACT_UPLOADER_TEST_UNSET/b"),
            "a/$ARTIFACT_UPLOADER_TEST_UNSET/b"
        );
    }

    #[test]
    fn test_no_variables() {
        assert_eq!(expand_env_vars(".serverless/svc.zip"), ".serverless/svc.zip");
        assert_eq!(expand_env_vars("price$"), "price$");
    }

    #[test]
    fn test_expand_path() {
        std::env::set_var("ARTIFACT_UPLOADER_TEST_PKG", "pkg");
        assert_eq!(
            expand_path(Path::new("$ARTIFACT_UPLOADER_TEST_PKG/first.zip")),
            PathBuf::from("pkg/first.zip")
        );
    }
}
