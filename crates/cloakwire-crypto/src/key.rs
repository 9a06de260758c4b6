//! Pre-shared key material.
//!
//! The key is configured out-of-band, identically on every channel member,
//! either as raw bytes or as a hex string. The holder keeps its own copy,
//! hands out defensive copies on read, and zeroizes on drop. Whether the
//! length fits the configured algorithm is validated lazily by the
//! transform, not here.

use std::fmt;

use zeroize::Zeroize;

use crate::{error::HexError, hex};

/// Owned pre-shared key bytes.
///
/// Immutable once set; replacing the key is only valid before startup.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKeyMaterial {
    bytes: Vec<u8>,
}

impl SecretKeyMaterial {
    /// Wrap raw key bytes. The input is copied.
    pub fn new(bytes: &[u8]) -> Self {
        Self { bytes: bytes.to_vec() }
    }

    /// Decode a hex-encoded key string.
    ///
    /// # Errors
    ///
    /// Hex formatting problems are reported as-is; see [`hex::decode`].
    pub fn from_hex(encoded: &str) -> Result<Self, HexError> {
        Ok(Self { bytes: hex::decode(encoded)? })
    }

    /// Key length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the key is empty (an unconfigured placeholder).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A defensive copy of the key bytes, for configuration read-back.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// The hex rendering of the key, for configuration read-back.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Borrow the key bytes for transform initialization.
    ///
    /// Named to make call sites that touch raw key material easy to audit.
    pub fn expose_secret(&self) -> &[u8] {
        &self.bytes
    }
}

// Zeroize key material on drop
impl Drop for SecretKeyMaterial {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl fmt::Debug for SecretKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKeyMaterial").field("len", &self.bytes.len()).finish_non_exhaustive()
    }
}
