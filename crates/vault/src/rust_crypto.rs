//! [`CryptoBackend`] backed by the RustCrypto crates and the OS random source.

#[allow(deprecated)] // upstream generic-array 0.x deprecation
use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use {
    rand::{TryRngCore, rngs::OsRng},
    zeroize::Zeroizing,
};

use crate::{
    cipher::NONCE_LEN,
    error::VaultError,
    kdf::{self, KEY_LEN},
    traits::CryptoBackend,
};

/// AES-256-GCM + PBKDF2-HMAC-SHA256 + `OsRng`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoBackend;

impl CryptoBackend for RustCryptoBackend {
    fn random_bytes(&self, buf: &mut [u8]) -> Result<(), VaultError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| VaultError::CryptoUnavailable(format!("secure random source: {e}")))
    }

    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, VaultError> {
        kdf::derive_key(password, salt, iterations)
    }

    #[allow(deprecated)]
    fn aead_encrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, VaultError> {
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| VaultError::CryptoUnavailable(e.to_string()))?;

        cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| VaultError::CryptoUnavailable(format!("AES-GCM encrypt: {e}")))
    }

    #[allow(deprecated)]
    fn aead_decrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, VaultError> {
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| VaultError::CryptoUnavailable(e.to_string()))?;

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| VaultError::AuthenticationFailed)
    }
}
