//! Reusable cipher transform handles.
//!
//! A [`TransformHandle`] is one validated binding of algorithm, mode,
//! padding, and key. Validation (algorithm name, key length) happens once
//! when the handle is built; the concrete mode cipher is then rebuilt from
//! the key and a caller-supplied IV inside every encrypt or decrypt call, so
//! a failed operation cannot leave residual state behind for the next user
//! of the handle.
//!
//! Handles are not shareable between concurrent operations; the pool hands
//! each one to a single operation at a time.

use aes::{Aes128, Aes192, Aes256};
use cipher::{
    AsyncStreamCipher, BlockCipher, BlockDecryptMut, BlockEncrypt, BlockEncryptMut, KeyIvInit,
    StreamCipher,
    block_padding::{NoPadding, Pkcs7},
};

use crate::{
    algorithm::{AlgorithmSpec, Mode, Padding},
    error::TransformError,
    key::SecretKeyMaterial,
};

/// AES block size in bytes, shared by all supported key sizes.
pub const AES_BLOCK_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

/// A stateful, reusable cipher transform bound to one algorithm
/// specification and one key.
pub struct TransformHandle {
    key: SecretKeyMaterial,
    key_size: KeySize,
    mode: Mode,
    padding: Padding,
}

impl TransformHandle {
    /// Build a transform for the given spec and key.
    ///
    /// This is where key-length validation happens: the configuration layer
    /// accepts any key bytes, and the mismatch only surfaces when the first
    /// operation needs a transform.
    ///
    /// # Errors
    ///
    /// - [`TransformError::UnknownAlgorithm`] unless the name is `AES`
    /// - [`TransformError::InvalidKeyLength`] for anything but 16/24/32 bytes
    pub fn new(spec: &AlgorithmSpec, key: &SecretKeyMaterial) -> Result<Self, TransformError> {
        if !spec.name().eq_ignore_ascii_case("AES") {
            return Err(TransformError::UnknownAlgorithm { name: spec.name().to_string() });
        }

        let key_size = match key.len() {
            16 => KeySize::Aes128,
            24 => KeySize::Aes192,
            32 => KeySize::Aes256,
            len => return Err(TransformError::InvalidKeyLength { len }),
        };

        Ok(Self { key: key.clone(), key_size, mode: spec.mode(), padding: spec.padding() })
    }

    /// Cipher block size in bytes; also the IV length.
    pub fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    /// Encrypt `plaintext` under the given IV.
    ///
    /// Empty input is valid: PKCS#7 emits a single padding block, the
    /// stream modes emit nothing.
    pub fn encrypt(&mut self, iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, TransformError> {
        let key = self.key.expose_secret();
        match self.mode {
            Mode::Cbc => {
                if self.padding == Padding::None && plaintext.len() % AES_BLOCK_SIZE != 0 {
                    return Err(TransformError::NotBlockAligned {
                        len: plaintext.len(),
                        block_size: AES_BLOCK_SIZE,
                    });
                }
                match self.key_size {
                    KeySize::Aes128 => cbc_encrypt::<Aes128>(key, iv, self.padding, plaintext),
                    KeySize::Aes192 => cbc_encrypt::<Aes192>(key, iv, self.padding, plaintext),
                    KeySize::Aes256 => cbc_encrypt::<Aes256>(key, iv, self.padding, plaintext),
                }
            },
            Mode::Ofb => {
                let mut data = plaintext.to_vec();
                match self.key_size {
                    KeySize::Aes128 => ofb_apply::<Aes128>(key, iv, &mut data)?,
                    KeySize::Aes192 => ofb_apply::<Aes192>(key, iv, &mut data)?,
                    KeySize::Aes256 => ofb_apply::<Aes256>(key, iv, &mut data)?,
                }
                Ok(data)
            },
            Mode::Cfb => {
                let mut data = plaintext.to_vec();
                match self.key_size {
                    KeySize::Aes128 => cfb_encrypt::<Aes128>(key, iv, &mut data)?,
                    KeySize::Aes192 => cfb_encrypt::<Aes192>(key, iv, &mut data)?,
                    KeySize::Aes256 => cfb_encrypt::<Aes256>(key, iv, &mut data)?,
                }
                Ok(data)
            },
        }
    }

    /// Decrypt `ciphertext` under the given IV.
    ///
    /// A padding mismatch (wrong key, corrupted data, or a different
    /// configuration on the sending end) surfaces as
    /// [`TransformError::Padding`].
    pub fn decrypt(&mut self, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, TransformError> {
        let key = self.key.expose_secret();
        match self.mode {
            Mode::Cbc => {
                // CBC ciphertext is always whole blocks, whatever the padding.
                if ciphertext.len() % AES_BLOCK_SIZE != 0 {
                    return Err(TransformError::NotBlockAligned {
                        len: ciphertext.len(),
                        block_size: AES_BLOCK_SIZE,
                    });
                }
                match self.key_size {
                    KeySize::Aes128 => cbc_decrypt::<Aes128>(key, iv, self.padding, ciphertext),
                    KeySize::Aes192 => cbc_decrypt::<Aes192>(key, iv, self.padding, ciphertext),
                    KeySize::Aes256 => cbc_decrypt::<Aes256>(key, iv, self.padding, ciphertext),
                }
            },
            Mode::Ofb => {
                // OFB is a keystream XOR; decryption is the same operation.
                let mut data = ciphertext.to_vec();
                match self.key_size {
                    KeySize::Aes128 => ofb_apply::<Aes128>(key, iv, &mut data)?,
                    KeySize::Aes192 => ofb_apply::<Aes192>(key, iv, &mut data)?,
                    KeySize::Aes256 => ofb_apply::<Aes256>(key, iv, &mut data)?,
                }
                Ok(data)
            },
            Mode::Cfb => {
                let mut data = ciphertext.to_vec();
                match self.key_size {
                    KeySize::Aes128 => cfb_decrypt::<Aes128>(key, iv, &mut data)?,
                    KeySize::Aes192 => cfb_decrypt::<Aes192>(key, iv, &mut data)?,
                    KeySize::Aes256 => cfb_decrypt::<Aes256>(key, iv, &mut data)?,
                }
                Ok(data)
            },
        }
    }
}

fn cbc_encrypt<C>(
    key: &[u8],
    iv: &[u8],
    padding: Padding,
    plaintext: &[u8],
) -> Result<Vec<u8>, TransformError>
where
    C: BlockEncryptMut + BlockCipher,
    cbc::Encryptor<C>: KeyIvInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| TransformError::InvalidIvLength { len: iv.len() })?;
    Ok(match padding {
        Padding::Pkcs7 => encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext),
        Padding::None => encryptor.encrypt_padded_vec_mut::<NoPadding>(plaintext),
    })
}

fn cbc_decrypt<C>(
    key: &[u8],
    iv: &[u8],
    padding: Padding,
    ciphertext: &[u8],
) -> Result<Vec<u8>, TransformError>
where
    C: BlockDecryptMut + BlockCipher,
    cbc::Decryptor<C>: KeyIvInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| TransformError::InvalidIvLength { len: iv.len() })?;
    match padding {
        Padding::Pkcs7 => {
            decryptor.decrypt_padded_vec_mut::<Pkcs7>(ciphertext).map_err(|_| TransformError::Padding)
        },
        Padding::None => decryptor
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| TransformError::Padding),
    }
}

fn ofb_apply<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), TransformError>
where
    C: BlockCipher + BlockEncrypt,
    C::BlockSize: cipher::typenum::IsLess<cipher::typenum::U256>,
    cipher::typenum::Le<C::BlockSize, cipher::typenum::U256>: cipher::typenum::NonZero,
    ofb::Ofb<C>: KeyIvInit + StreamCipher,
{
    let mut cipher = ofb::Ofb::<C>::new_from_slices(key, iv)
        .map_err(|_| TransformError::InvalidIvLength { len: iv.len() })?;
    cipher.apply_keystream(data);
    Ok(())
}

fn cfb_encrypt<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), TransformError>
where
    C: BlockCipher + BlockEncrypt,
    cfb_mode::Encryptor<C>: KeyIvInit + AsyncStreamCipher + BlockEncryptMut,
{
    let encryptor = cfb_mode::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| TransformError::InvalidIvLength { len: iv.len() })?;
    encryptor.encrypt(data);
    Ok(())
}

fn cfb_decrypt<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), TransformError>
where
    C: BlockCipher + BlockEncrypt,
    cfb_mode::Decryptor<C>: KeyIvInit + AsyncStreamCipher + BlockDecryptMut,
{
    let decryptor = cfb_mode::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| TransformError::InvalidIvLength { len: iv.len() })?;
    decryptor.decrypt(data);
    Ok(())
}
