//! Cloakwire Channel Surface
//!
//! Transparent message encryption for group-channel pipelines. A channel
//! assembles [`Interceptor`] stages into a stack; placing an
//! [`EncryptionInterceptor`] in that stack encrypts every outbound message
//! body under a pre-shared key and decrypts every inbound one, without the
//! stages above or below knowing.
//!
//! The cryptographic engine itself lives in [`cloakwire_crypto`]; this
//! crate contributes the pipeline-facing pieces:
//!
//! - [`ChannelMessage`]: the body container rewritten in place
//! - [`Interceptor`] and [`Capabilities`]: the stage contract and the
//!   lifecycle gating flags
//! - [`EncryptConfig`] and [`EncryptionInterceptor`]: the management
//!   surface and the encrypting stage
//!
//! # Error Policy
//!
//! Send-path failures propagate to the sender (the message is not
//! transmitted). Receive-path failures are logged and the message dropped:
//! a received message has no response channel, so there is nobody to
//! propagate to.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod encrypt;
mod error;
mod interceptor;
mod message;

pub use encrypt::{DEFAULT_ENCRYPTION_ALGORITHM, EncryptConfig, EncryptionInterceptor};
pub use error::ChannelError;
pub use interceptor::{Capabilities, Interceptor};
pub use message::ChannelMessage;
