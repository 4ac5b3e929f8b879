//! Hash Utilities
//! Content fingerprints for delivered artifacts
//! Author: kartik4091
//! Created: 2025-06-04

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
