//! Hashing utilities for stable identifiers.
//!
//! Visual Studio cross-references projects and filters by GUID. Every GUID we
//! emit is derived from a seed string so that re-exporting an unchanged
//! project yields byte-identical documents.

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// A hasher for building identifiers from multiple components.
#[derive(Default)]
pub struct Fingerprint {
    hasher: Sha256,
}

impl Fingerprint {
    /// Create a new fingerprint builder.
    pub fn new() -> Self {
        Fingerprint {
            hasher: Sha256::new(),
        }
    }

    /// Add a string component to the fingerprint.
    pub fn update_str(&mut self, s: &str) -> &mut Self {
        self.hasher.update(s.as_bytes());
        self.hasher.update(b"\0"); // Separator
        self
    }

    /// Finalize into a braced, upper-case GUID (`{XXXXXXXX-XXXX-...}`).
    pub fn finish_guid(self) -> String {
        let digest = self.hasher.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        format_guid(Uuid::from_bytes(bytes))
    }
}

/// Derive a GUID from a single seed string.
pub fn guid_from_seed(seed: &str) -> String {
    let mut fp = Fingerprint::new();
    fp.update_str(seed);
    fp.finish_guid()
}

fn format_guid(uuid: Uuid) -> String {
    format!("{{{}}}", uuid.hyphenated()).to_uppercase()
}
