//! Error types for the encryption engine.
//!
//! Each layer has its own error enum so callers can distinguish fatal
//! configuration problems (reject at startup, never retried) from
//! per-message crypto failures (fail or drop that one message, keep going).

use thiserror::Error;

/// Errors produced by the hex codec.
///
/// Hex strings are only used for key configuration; these errors are
/// surfaced immediately to whoever is setting the key, never corrected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// Input has an odd number of digits and cannot form whole bytes.
    #[error("odd number of hex digits: {len}")]
    OddLength {
        /// Number of characters in the input
        len: usize,
    },

    /// Input contains a character outside `[0-9a-fA-F]`.
    #[error("invalid hex digit {ch:?} at position {index}")]
    InvalidDigit {
        /// The offending character
        ch: char,
        /// Zero-based character position
        index: usize,
    },
}

/// Configuration errors. Fatal at startup; initialization must stop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No pre-shared key was configured before startup.
    #[error("encryption key is required")]
    MissingKey,

    /// The algorithm string is not of the `Algorithm/Mode/Padding` form.
    #[error("malformed algorithm specification {value:?}: expected Algorithm/Mode/Padding")]
    AlgorithmFormat {
        /// The rejected specification string
        value: String,
    },

    /// The mode token is not one of the allowed block modes.
    ///
    /// ECB is rejected deliberately: it leaks plaintext patterns and is not
    /// an appropriate mode for secure communications.
    #[error("unsupported cipher mode {mode:?}: must be CBC, OFB, or CFB")]
    UnsupportedMode {
        /// The rejected mode token
        mode: String,
    },

    /// The padding token is not a recognized padding scheme.
    #[error("unsupported padding scheme {padding:?}")]
    UnsupportedPadding {
        /// The rejected padding token
        padding: String,
    },

    /// A provider was named that this build does not offer.
    #[error("unknown cryptographic provider {name:?}")]
    UnknownProvider {
        /// The rejected provider name
        name: String,
    },

    /// The hex-encoded key string could not be decoded.
    #[error("malformed hex key: {0}")]
    InvalidKeyHex(#[from] HexError),
}

/// Errors raised by a transform handle while initializing or finalizing a
/// cipher operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The algorithm name has no implementation in this build.
    #[error("unknown cipher algorithm {name:?}")]
    UnknownAlgorithm {
        /// The rejected algorithm name
        name: String,
    },

    /// The key length does not match any key size the algorithm accepts.
    #[error("invalid key length {len}: AES accepts 16, 24, or 32 bytes")]
    InvalidKeyLength {
        /// Configured key length in bytes
        len: usize,
    },

    /// The IV length does not match the cipher block size.
    #[error("invalid IV length {len}")]
    InvalidIvLength {
        /// Supplied IV length in bytes
        len: usize,
    },

    /// Input must be a whole number of blocks for this mode/padding.
    #[error("input length {len} is not a multiple of the {block_size}-byte block size")]
    NotBlockAligned {
        /// Input length in bytes
        len: usize,
        /// Cipher block size in bytes
        block_size: usize,
    },

    /// Padding could not be removed: wrong key, corrupted ciphertext, or a
    /// mismatched algorithm/mode configuration between the two ends.
    #[error("bad padding: wrong key, corrupted data, or mismatched cipher configuration")]
    Padding,
}

/// A failure on the encrypt (send) path. Propagated to the sender; the
/// message is not transmitted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncryptError {
    /// Transform initialization or finalization failed.
    #[error("encryption failed: {0}")]
    Transform(#[from] TransformError),
}

/// A failure on the decrypt (receive) path. The receiving layer logs the
/// error and drops the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptError {
    /// The framed input is shorter than one cipher block, so it cannot even
    /// contain the IV. Rejected before any transform work.
    #[error("encrypted payload too short: {len} bytes, need at least {block_size}")]
    InputTooShort {
        /// Received payload length in bytes
        len: usize,
        /// Cipher block size in bytes
        block_size: usize,
    },

    /// Transform initialization or finalization failed.
    #[error("decryption failed: {0}")]
    Transform(#[from] TransformError),
}
