//! The encrypting interceptor and its configuration surface.
//!
//! Inserted into a channel stack, this stage makes encryption transparent:
//! outbound bodies are replaced with `iv || ciphertext` before the next
//! stage sees them, inbound bodies are decrypted before delegation. The
//! pre-shared key and algorithm come from the management surface as an
//! [`EncryptConfig`]; nothing is initialized until `start` signals that
//! transmission sequencing is active.

use cloakwire_crypto::{
    AlgorithmSpec, ConfigError, EncryptionCodec, HexError, SecretKeyMaterial, validate_spec_string,
};

use crate::{
    error::ChannelError,
    interceptor::{Capabilities, Interceptor},
    message::ChannelMessage,
};

/// Algorithm used when the configuration does not name one.
pub const DEFAULT_ENCRYPTION_ALGORITHM: &str = "AES/CBC/PKCS5Padding";

/// Configuration for the encrypting interceptor.
///
/// Collected before startup from the management surface. The key may be
/// supplied as raw bytes or as a hex string; both set the same internal
/// state. Read-back accessors return copies, never the internal buffers.
#[derive(Debug, Clone)]
pub struct EncryptConfig {
    algorithm: String,
    key: Option<SecretKeyMaterial>,
    provider: Option<String>,
}

impl Default for EncryptConfig {
    fn default() -> Self {
        Self { algorithm: DEFAULT_ENCRYPTION_ALGORITHM.to_string(), key: None, provider: None }
    }
}

impl EncryptConfig {
    /// Configuration with the default algorithm and no key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `Algorithm/Mode/Padding` specification.
    ///
    /// The setter requires the full three-segment form; see
    /// [`validate_spec_string`]. Mode validation (the ECB rejection) happens
    /// at startup when the spec is parsed.
    pub fn set_algorithm(&mut self, spec: &str) -> Result<(), ConfigError> {
        validate_spec_string(spec)?;
        self.algorithm = spec.to_string();
        Ok(())
    }

    /// The configured algorithm specification string.
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    /// Set the pre-shared key from raw bytes. The input is copied.
    pub fn set_key_bytes(&mut self, key: &[u8]) {
        self.key = Some(SecretKeyMaterial::new(key));
    }

    /// Set the pre-shared key from a hex string.
    ///
    /// Surrounding whitespace is tolerated; formatting errors are surfaced
    /// immediately and leave the previous key untouched.
    pub fn set_key_hex(&mut self, key: &str) -> Result<(), HexError> {
        self.key = Some(SecretKeyMaterial::from_hex(key.trim())?);
        Ok(())
    }

    /// Remove the configured key, returning to the unconfigured state.
    pub fn clear_key(&mut self) {
        self.key = None;
    }

    /// A defensive copy of the configured key bytes, if any.
    pub fn key_bytes(&self) -> Option<Vec<u8>> {
        self.key.as_ref().map(SecretKeyMaterial::bytes)
    }

    /// The hex rendering of the configured key, if any.
    pub fn key_hex(&self) -> Option<String> {
        self.key.as_ref().map(|key| key.to_hex())
    }

    /// Select a named cryptographic provider, or `None` for the default.
    pub fn set_provider(&mut self, name: Option<&str>) {
        self.provider = name.map(str::to_string);
    }

    /// The configured provider name, if any.
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }
}

/// A channel interceptor that encrypts with a pre-shared key.
///
/// The key length must be acceptable for the configured algorithm; for AES
/// that is 16, 24, or 32 bytes.
pub struct EncryptionInterceptor {
    config: EncryptConfig,
    codec: Option<EncryptionCodec>,
    next: Option<Box<dyn Interceptor>>,
}

impl EncryptionInterceptor {
    /// Create a terminal (end-of-stack) encrypting interceptor.
    pub fn new(config: EncryptConfig) -> Self {
        Self { config, codec: None, next: None }
    }

    /// Create an encrypting interceptor that delegates to `next`.
    pub fn with_next(config: EncryptConfig, next: Box<dyn Interceptor>) -> Self {
        Self { config, codec: None, next: Some(next) }
    }

    /// The configuration this interceptor was built with.
    pub fn config(&self) -> &EncryptConfig {
        &self.config
    }

    /// Whether `start` has initialized the encryption layer.
    pub fn is_started(&self) -> bool {
        self.codec.is_some()
    }

    /// The running codec, for diagnostics. `None` before `start`.
    pub fn codec(&self) -> Option<&EncryptionCodec> {
        self.codec.as_ref()
    }

    fn build_codec(&self) -> Result<EncryptionCodec, ConfigError> {
        let key = self.config.key.clone().ok_or(ConfigError::MissingKey)?;
        let spec = AlgorithmSpec::parse(self.config.algorithm())?;
        EncryptionCodec::new(spec, key, self.config.provider())
    }
}

impl Interceptor for EncryptionInterceptor {
    fn start(&mut self, capabilities: Capabilities) -> Result<(), ChannelError> {
        if capabilities.contains(Capabilities::SEND_TX_SEQUENCE) {
            let codec = self.build_codec()?;
            tracing::debug!(algorithm = %codec.spec().spec_string(), "encryption layer started");
            self.codec = Some(codec);
        }

        match self.next.as_mut() {
            Some(next) => next.start(capabilities),
            None => Ok(()),
        }
    }

    fn stop(&mut self, capabilities: Capabilities) -> Result<(), ChannelError> {
        if capabilities.contains(Capabilities::SEND_TX_SEQUENCE) {
            // Pooled handles need no explicit teardown; dropping is enough.
            if let Some(codec) = self.codec.take() {
                codec.shutdown();
                tracing::debug!("encryption layer stopped");
            }
        }

        match self.next.as_mut() {
            Some(next) => next.stop(capabilities),
            None => Ok(()),
        }
    }

    fn send_message(&self, msg: &mut ChannelMessage) -> Result<(), ChannelError> {
        let codec = self.codec.as_ref().ok_or(ChannelError::NotStarted)?;

        let frame = match codec.encrypt(msg.body()) {
            Ok(frame) => frame,
            Err(err) => {
                tracing::error!(error = %err, "failed to encrypt outbound message");
                return Err(err.into());
            },
        };

        // Completely replace the body with the framed payload.
        msg.clear();
        msg.append(&frame.iv);
        msg.append(&frame.ciphertext);

        match self.next.as_ref() {
            Some(next) => next.send_message(msg),
            None => Ok(()),
        }
    }

    fn message_received(&self, msg: &mut ChannelMessage) {
        let Some(codec) = self.codec.as_ref() else {
            tracing::error!("inbound message before encryption layer started; dropping");
            return;
        };

        match codec.decrypt(msg.body()) {
            Ok(plaintext) => {
                // Completely replace the body with the decrypted payload.
                msg.clear();
                msg.append(&plaintext);
                if let Some(next) = self.next.as_ref() {
                    next.message_received(msg);
                }
            },
            Err(err) => {
                // Receipt has no response channel: log and drop.
                tracing::error!(error = %err, "failed to decrypt inbound message; dropping");
            },
        }
    }
}
