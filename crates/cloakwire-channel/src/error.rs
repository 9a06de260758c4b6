//! Error type for the channel interceptor surface.
//!
//! Only the send path and the lifecycle hooks report errors to the caller.
//! Decrypt failures never appear here: receipt is a one-way notification
//! with no response channel, so the receive path logs and drops instead.

use cloakwire_crypto::{ConfigError, EncryptError};
use thiserror::Error;

/// Errors surfaced by interceptor lifecycle and send hooks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// A message hook ran before `start` initialized the encryption layer.
    #[error("encryption layer is not started")]
    NotStarted,

    /// Startup configuration was invalid; initialization must stop.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Encrypting an outbound message failed; the message is not sent.
    #[error("send failed: {0}")]
    Encrypt(#[from] EncryptError),
}
