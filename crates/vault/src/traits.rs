//! Capability trait for the platform's cryptographic primitives.

use zeroize::Zeroizing;

use crate::{cipher::NONCE_LEN, error::VaultError, kdf::KEY_LEN};

/// Narrow interface over a random source, a password KDF and an AEAD cipher.
///
/// [`CredentialCipher`](crate::CredentialCipher) only talks to this trait, so
/// the blob format stays the same whichever native backend sits underneath.
pub trait CryptoBackend: Send + Sync {
    /// Fill `buf` from a cryptographically secure random source.
    fn random_bytes(&self, buf: &mut [u8]) -> Result<(), VaultError>;

    /// Stretch `password` with `salt` into a symmetric key.
    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, VaultError>;

    /// Encrypt `plaintext`, returning `ciphertext || tag`.
    fn aead_encrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, VaultError>;

    /// Verify and decrypt `ciphertext || tag`.
    ///
    /// A tag mismatch must surface as [`VaultError::AuthenticationFailed`].
    fn aead_decrypt(
        &self,
        key: &[u8; KEY_LEN],
        nonce: &[u8; NONCE_LEN],
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, VaultError>;
}
