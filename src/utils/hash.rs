use sha2::{Digest, Sha256};

/// Calculate the content fingerprint of a byte buffer.
///
/// Lowercase hex SHA-256; the same bytes always yield the same string.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
