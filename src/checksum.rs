//! Checksum utilities for generated artifacts

use sha2::{Digest, Sha256};
use std::fmt;

/// Name of the checksum listing written next to the artifacts
pub const CHECKSUMS_FILE: &str = "checksums.sha256";

/// SHA256 checksum of artifact content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum(String);

impl Checksum {
    /// Compute checksum from raw bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{:x}", hash))
    }

    /// Compute checksum from text content
    pub fn from_content(content: &str) -> Self {
        Self::from_bytes(content.as_bytes())
    }

    /// Get the hex string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verify that content matches this checksum
    pub fn verify(&self, content: &str) -> bool {
        Self::from_content(content) == *self
    }

    /// `sha256sum`-style listing, one `<hash>  <name>` line per entry
    pub fn listing(entries: &[(String, Checksum)]) -> String {
        entries
            .iter()
            .map(|(name, checksum)| format!("{}  {}\n", checksum, name))
            .collect()
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
