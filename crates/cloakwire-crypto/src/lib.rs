//! Cloakwire Encryption Engine
//!
//! Symmetric encryption for group-channel messages under a pre-shared key.
//! Every outbound payload is encrypted with a fresh random IV and framed as
//! `iv || ciphertext`; every inbound payload is split and decrypted. The
//! engine is synchronous and safe for concurrent use from multiple threads
//! without external locking.
//!
//! # Message Flow
//!
//! ```text
//! Configuration (spec string, key, provider)
//!        │
//!        ▼
//! AlgorithmSpec + SecretKeyMaterial
//!        │
//!        ▼
//! EncryptionCodec ── Pool<TransformHandle> ── Pool<RandomHandle>
//!        │
//!        ▼
//! EncryptedFrame → iv || ciphertext on the wire
//! ```
//!
//! # Concurrency
//!
//! Transforms and random sources are stateful and must never be shared
//! between two in-flight operations. The pools enforce the single-holder
//! discipline by construction: `acquire` moves a handle out of the shared
//! free-list and it only becomes visible again after release. Nothing
//! blocks; under sustained concurrency the pools grow to the high-water
//! mark of simultaneous operations and are drained at shutdown.
//!
//! # Security
//!
//! - A fresh random IV per encrypt call, unconditionally. IV reuse under
//!   one key is a correctness violation, not an optimization opportunity.
//! - ECB is rejected at configuration time; only CBC, OFB, and CFB pass
//!   validation.
//! - Key material is zeroized on drop and never printed by `Debug`.
//! - The chosen cipher modes provide no authentication; tampering surfaces
//!   as a padding error at best. Callers needing integrity must layer it
//!   separately (out of scope here, as is key distribution).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod algorithm;
mod codec;
mod error;
pub mod hex;
mod key;
mod pool;
mod random;
mod transform;

pub use algorithm::{AlgorithmSpec, Mode, Padding, validate_spec_string};
pub use codec::{EncryptedFrame, EncryptionCodec, SOFTWARE_PROVIDER};
pub use error::{ConfigError, DecryptError, EncryptError, HexError, TransformError};
pub use key::SecretKeyMaterial;
pub use pool::{Checkout, Pool};
pub use random::RandomHandle;
pub use transform::{AES_BLOCK_SIZE, TransformHandle};
