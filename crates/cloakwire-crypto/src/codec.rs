//! The encryption codec: pooled encrypt/decrypt with per-message IVs.
//!
//! One codec instance owns the validated configuration and both handle
//! pools. Encrypt and decrypt take `&self` and may be called from any number
//! of threads; the pools are the only shared mutable state, and every handle
//! is checked out for exactly one operation.
//!
//! # Wire format
//!
//! A fresh random IV is generated for every encrypt call and prepended to
//! the ciphertext as a nonce, so the receiving end needs no out-of-band IV:
//! the transmitted payload is `iv (block size bytes) || ciphertext`. There
//! is no length prefix; the surrounding transport preserves message
//! boundaries.

use crate::{
    algorithm::AlgorithmSpec,
    error::{ConfigError, DecryptError, EncryptError},
    key::SecretKeyMaterial,
    pool::Pool,
    random::RandomHandle,
    transform::TransformHandle,
};

/// Name of the built-in software cipher provider.
pub const SOFTWARE_PROVIDER: &str = "rustcrypto";

/// One encrypted message, before wire framing.
///
/// IV and ciphertext are kept as two independent buffers: the caller is
/// going to rebuild the outgoing message body anyway, so concatenating here
/// would only add an allocation and a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedFrame {
    /// Per-message initialization vector, one cipher block long.
    pub iv: Vec<u8>,
    /// Encrypted payload.
    pub ciphertext: Vec<u8>,
}

impl EncryptedFrame {
    /// Total framed length on the wire.
    pub fn wire_len(&self) -> usize {
        self.iv.len() + self.ciphertext.len()
    }

    /// Concatenate into a single `iv || ciphertext` buffer.
    ///
    /// Convenience for callers that do not rebuild a message body in place.
    pub fn to_wire(&self) -> Vec<u8> {
        let mut wire = Vec::with_capacity(self.wire_len());
        wire.extend_from_slice(&self.iv);
        wire.extend_from_slice(&self.ciphertext);
        wire
    }
}

/// Symmetric encryption engine with pooled transform reuse.
///
/// Construction validates everything that can be validated without touching
/// a cipher (key presence, provider name); key-length problems surface on
/// the first operation, when the transform is actually built.
pub struct EncryptionCodec {
    spec: AlgorithmSpec,
    key: SecretKeyMaterial,
    transforms: Pool<TransformHandle>,
    randoms: Pool<RandomHandle>,
}

impl EncryptionCodec {
    /// Build a codec from a parsed algorithm spec and key material.
    ///
    /// The pools start empty and fill lazily as operations run.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingKey`] if the key is absent (empty)
    /// - [`ConfigError::UnknownProvider`] if a provider other than the
    ///   built-in software implementation is requested
    pub fn new(
        spec: AlgorithmSpec,
        key: SecretKeyMaterial,
        provider: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::MissingKey);
        }
        if let Some(name) = provider {
            if !name.eq_ignore_ascii_case(SOFTWARE_PROVIDER) {
                return Err(ConfigError::UnknownProvider { name: name.to_string() });
            }
        }

        Ok(Self { spec, key, transforms: Pool::new(), randoms: Pool::new() })
    }

    /// The algorithm specification this codec was built with.
    pub fn spec(&self) -> &AlgorithmSpec {
        &self.spec
    }

    /// Encrypt a message payload.
    ///
    /// Draws a fresh random IV for this call — unconditionally, since
    /// reusing an IV under the same key would let identical plaintexts be
    /// correlated (and worse, depending on the mode).
    ///
    /// Both checked-out handles return to their pools on every exit path.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedFrame, EncryptError> {
        let mut transform =
            self.transforms.try_checkout_or_else(|| TransformHandle::new(&self.spec, &self.key))?;
        let mut random = self.randoms.checkout_or_else(RandomHandle::new);

        let mut iv = vec![0u8; transform.block_size()];
        random.fill(&mut iv);

        let ciphertext = transform.encrypt(&iv, plaintext)?;
        Ok(EncryptedFrame { iv, ciphertext })
    }

    /// Decrypt a framed `iv || ciphertext` payload.
    ///
    /// # Errors
    ///
    /// - [`DecryptError::InputTooShort`] if the payload cannot even contain
    ///   an IV; rejected before any cipher work
    /// - [`DecryptError::Transform`] for everything the cipher rejects,
    ///   including padding mismatches from a wrong key or corrupted data
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, DecryptError> {
        let mut transform =
            self.transforms.try_checkout_or_else(|| TransformHandle::new(&self.spec, &self.key))?;

        let block_size = transform.block_size();
        if data.len() < block_size {
            return Err(DecryptError::InputTooShort { len: data.len(), block_size });
        }

        // First block is the IV; the remainder is ciphertext.
        let (iv, ciphertext) = data.split_at(block_size);
        Ok(transform.decrypt(iv, ciphertext)?)
    }

    /// Discard all pooled handles.
    ///
    /// Called at shutdown; the surrounding lifecycle guarantees no
    /// operations run concurrently with this.
    pub fn shutdown(&self) {
        self.transforms.clear();
        self.randoms.clear();
    }

    /// Number of idle transform handles currently pooled (diagnostics).
    pub fn pooled_transforms(&self) -> usize {
        self.transforms.len()
    }

    /// Number of idle random handles currently pooled (diagnostics).
    pub fn pooled_randoms(&self) -> usize {
        self.randoms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;

    fn codec(spec: &str, key: &[u8]) -> EncryptionCodec {
        EncryptionCodec::new(
            AlgorithmSpec::parse(spec).unwrap(),
            SecretKeyMaterial::new(key),
            None,
        )
        .unwrap()
    }

    #[test]
    fn round_trip_with_default_configuration() {
        let codec = codec("AES/CBC/PKCS5Padding", &[0x42; 16]);
        let frame = codec.encrypt(b"hello group").unwrap();
        assert_eq!(frame.iv.len(), 16);
        assert_eq!(codec.decrypt(&frame.to_wire()).unwrap(), b"hello group".to_vec());
    }

    #[test]
    fn empty_plaintext_round_trips() {
        let codec = codec("AES/CBC/PKCS5Padding", &[0x42; 16]);
        let frame = codec.encrypt(b"").unwrap();
        assert_eq!(codec.decrypt(&frame.to_wire()).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn short_input_is_rejected_before_any_cipher_work() {
        let codec = codec("AES/CBC/PKCS5Padding", &[0x42; 16]);
        let result = codec.decrypt(&[0u8; 15]);
        assert_eq!(
            result.err(),
            Some(DecryptError::InputTooShort { len: 15, block_size: 16 })
        );
    }

    #[test]
    fn missing_key_fails_construction() {
        let result = EncryptionCodec::new(
            AlgorithmSpec::parse("AES/CBC/PKCS5Padding").unwrap(),
            SecretKeyMaterial::new(&[]),
            None,
        );
        assert!(matches!(result, Err(ConfigError::MissingKey)));
    }

    #[test]
    fn named_software_provider_is_accepted() {
        let result = EncryptionCodec::new(
            AlgorithmSpec::parse("AES/CBC/PKCS5Padding").unwrap(),
            SecretKeyMaterial::new(&[0x42; 16]),
            Some("RustCrypto"),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn unknown_provider_fails_construction() {
        let result = EncryptionCodec::new(
            AlgorithmSpec::parse("AES/CBC/PKCS5Padding").unwrap(),
            SecretKeyMaterial::new(&[0x42; 16]),
            Some("SunJCE"),
        );
        assert!(matches!(result, Err(ConfigError::UnknownProvider { name }) if name == "SunJCE"));
    }

    #[test]
    fn bad_key_length_surfaces_on_first_operation() {
        // Construction succeeds; the transform validates the key lazily.
        let codec = codec("AES/CBC/PKCS5Padding", &[0x42; 10]);
        let result = codec.encrypt(b"payload");
        assert_eq!(
            result.err(),
            Some(EncryptError::Transform(TransformError::InvalidKeyLength { len: 10 }))
        );
        // Failed construction must not grow the pool.
        assert_eq!(codec.pooled_transforms(), 0);
    }

    #[test]
    fn sequential_operations_reuse_one_handle() {
        let codec = codec("AES/CBC/PKCS5Padding", &[0x42; 16]);
        for _ in 0..8 {
            let frame = codec.encrypt(b"reuse me").unwrap();
            codec.decrypt(&frame.to_wire()).unwrap();
        }
        assert_eq!(codec.pooled_transforms(), 1);
        assert_eq!(codec.pooled_randoms(), 1);
    }

    #[test]
    fn handles_return_to_the_pool_after_failures() {
        let codec = codec("AES/CBC/PKCS5Padding", &[0x42; 16]);
        // Warm the pool, then fail a decrypt (ragged ciphertext length).
        codec.encrypt(b"warm").unwrap();
        assert!(codec.decrypt(&[0u8; 33]).is_err());
        assert_eq!(codec.pooled_transforms(), 1);
    }

    #[test]
    fn shutdown_drains_both_pools() {
        let codec = codec("AES/CBC/PKCS5Padding", &[0x42; 16]);
        codec.encrypt(b"fill the pools").unwrap();
        assert_eq!(codec.pooled_transforms(), 1);
        assert_eq!(codec.pooled_randoms(), 1);

        codec.shutdown();
        assert_eq!(codec.pooled_transforms(), 0);
        assert_eq!(codec.pooled_randoms(), 0);
    }
}
