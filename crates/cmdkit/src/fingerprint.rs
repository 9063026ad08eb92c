//! Content fingerprints for command runs.
//!
//! A fingerprint is the lowercase hex SHA-256 of the command line bytes
//! followed by the captured output bytes. Nothing else feeds the hash, so
//! two runs agree exactly when the same command text produced the same
//! output.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 of `command ++ output`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Length of a fingerprint in hex characters.
    pub const LEN: usize = 64;

    /// Compute the fingerprint of a command line and its output.
    pub fn compute(command: &str, output: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(command.as_bytes());
        hasher.update(output);
        Self(hex::encode(hasher.finalize()))
    }

    /// Check a persisted identifier against this fingerprint.
    ///
    /// An empty identifier never matches.
    pub fn matches(&self, id: &str) -> bool {
        !id.is_empty() && self.0 == id
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.0
    }
}
