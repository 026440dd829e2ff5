//! Security utilities and validation functions.
//!
//! This module provides:
//! - Bucket name and object key prefix validation
//! - Credential scrubbing to prevent sensitive data exposure in logs

pub mod credential_scrubber;
pub mod key_validator;

pub use credential_scrubber::{safe_error_message, scrub_credentials};
pub use key_validator::{validate_bucket_name, validate_object_prefix};
