//! Small helpers shared by the upload steps.
//!
//! ```
//! use artifact_uploader::utils::hash::fingerprint;
//! use artifact_uploader::utils::size::format_kilobytes;
//!
//! assert_eq!(fingerprint(b"abc").len(), 64);
//! assert_eq!(format_kilobytes(1024), "1 KB");
//! ```

/// Content fingerprints used as upload metadata
pub mod hash;

/// Human-readable sizes for progress messages
pub mod size;
