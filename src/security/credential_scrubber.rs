//! Credential scrubbing for messages that leave the process.
//!
//! Gateway errors can echo request headers or presigned URLs. Everything
//! logged by the CLI passes through [`scrub_credentials`] first.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CREDENTIAL_PATTERNS: Vec<(Regex, &'static str)> = vec![
        // SSE-C key header or config field
        (Regex::new(r"(?i)(x-amz-server-side-encryption-customer-key|sse[_-]?customer[_-]?key)(\s*[:=]\s*)([A-Za-z0-9/+=]{8,})").unwrap(),
         "$1$2<REDACTED_SSE_KEY>"),

        // AWS Secret Access Key
        (Regex::new(r"(?i)(aws[_-]?secret[_-]?access[_-]?key|secret[_-]?access[_-]?key)\s*[:=]\s*([A-Za-z0-9/+=]{32,})").unwrap(),
         "$1=<REDACTED_AWS_SECRET>"),

        // Session tokens, as header, field or presigned URL parameter
        (Regex::new(r"(?i)(x-amz-security-token|aws[_-]?session[_-]?token)\s*[:=]\s*([A-Za-z0-9/+=%]{16,})").unwrap(),
         "$1=<REDACTED_TOKEN>"),

        // Presigned URL signature
        (Regex::new(r"(?i)(x-amz-signature)=([0-9a-f]{16,})").unwrap(),
         "$1=<REDACTED_SIGNATURE>"),

        // AWS Access Key ID, wherever it appears
        (Regex::new(r"\b(AKIA|ASIA)[A-Z0-9]{16}\b").unwrap(),
         "<REDACTED_AWS_KEY>"),
    ];
}

/// Scrub credentials from a string.
///
/// # Example
///
/// ```
/// use artifact_uploader::security::credential_scrubber::scrub_credentials;
///
/// let input = "request failed: sse_customer_key=c2VjcmV0LWtleS1tYXRlcmlhbA==";
/// assert_eq!(scrub_credentials(input), "request failed: sse_customer_key=<REDACTED_SSE_KEY>");
/// ```
pub fn scrub_credentials(input: &str) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in CREDENTIAL_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }

    result
}

/// Format an error with context and scrub it for logging.
pub fn safe_error_message(context: &str, error: &impl std::fmt::Display) -> String {
    scrub_credentials(&format!("{}: {}", context, error))
}
