//! Credential blob sealing: `base64(salt || nonce || ciphertext+tag)`.

use {narrator_common::codec, zeroize::Zeroizing};

use crate::{
    error::VaultError,
    kdf::{KEY_LEN, PBKDF2_ITERATIONS},
    rust_crypto::RustCryptoBackend,
    traits::CryptoBackend,
};

/// Salt length, regenerated on every encryption.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length, regenerated on every encryption.
pub const NONCE_LEN: usize = 12;

/// Shortest decoded blob accepted by [`CredentialCipher::decrypt`].
pub const MIN_BLOB_LEN: usize = SALT_LEN + NONCE_LEN;

/// Password-based authenticated encryption of a credential string.
///
/// Generic over [`CryptoBackend`] but defaults to [`RustCryptoBackend`].
/// Holds no key material: every call derives its key from the password and
/// the blob's own salt, then drops it.
#[derive(Debug, Clone)]
pub struct CredentialCipher<B: CryptoBackend = RustCryptoBackend> {
    backend: B,
    iterations: u32,
}

impl CredentialCipher<RustCryptoBackend> {
    /// Cipher over the default RustCrypto backend.
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(RustCryptoBackend)
    }
}

impl Default for CredentialCipher<RustCryptoBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: CryptoBackend> CredentialCipher<B> {
    /// Cipher over a custom backend with the standard iteration count.
    #[must_use]
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            iterations: PBKDF2_ITERATIONS,
        }
    }

    /// Cipher with a non-standard PBKDF2 iteration count.
    ///
    /// The count is not recorded in the blob, so a blob only opens under the
    /// count it was sealed with.
    #[must_use]
    pub fn with_iterations(backend: B, iterations: u32) -> Self {
        Self {
            backend,
            iterations,
        }
    }

    /// PBKDF2 iteration count in use.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Stretch `password` with `salt` into an AES-256 key.
    pub fn derive_key(
        &self,
        password: &str,
        salt: &[u8; SALT_LEN],
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, VaultError> {
        self.backend
            .derive_key(codec::text_to_bytes(password), salt, self.iterations)
    }

    /// Seal `plaintext` under `password` and return the base64 blob.
    pub fn encrypt(&self, plaintext: &str, password: &str) -> Result<String, VaultError> {
        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        self.backend.random_bytes(&mut salt)?;
        self.backend.random_bytes(&mut nonce)?;

        let key = self.derive_key(password, &salt)?;
        let ciphertext = self
            .backend
            .aead_encrypt(&key, &nonce, codec::text_to_bytes(plaintext))?;

        let blob = codec::concat(&[&salt[..], &nonce[..], &ciphertext[..]]);

        #[cfg(feature = "tracing")]
        tracing::debug!(blob_len = blob.len(), "credential sealed");

        Ok(codec::encode_base64(&blob))
    }

    /// Open a blob produced by [`encrypt`](Self::encrypt).
    ///
    /// A wrong password and a tampered blob both yield
    /// [`VaultError::AuthenticationFailed`].
    pub fn decrypt(&self, blob: &str, password: &str) -> Result<String, VaultError> {
        let raw = codec::decode_base64(blob)
            .map_err(|e| VaultError::MalformedBlob(format!("invalid base64: {e}")))?;

        if raw.len() < MIN_BLOB_LEN {
            return Err(VaultError::MalformedBlob(format!(
                "blob is {} bytes, expected at least {MIN_BLOB_LEN}",
                raw.len()
            )));
        }

        let (salt, rest) = codec::split_prefix(&raw, SALT_LEN)
            .ok_or_else(|| VaultError::MalformedBlob("missing salt".to_string()))?;
        let (nonce, ciphertext) = codec::split_prefix(rest, NONCE_LEN)
            .ok_or_else(|| VaultError::MalformedBlob("missing nonce".to_string()))?;

        let salt: &[u8; SALT_LEN] = salt
            .try_into()
            .map_err(|_| VaultError::MalformedBlob("salt length".to_string()))?;
        let nonce: &[u8; NONCE_LEN] = nonce
            .try_into()
            .map_err(|_| VaultError::MalformedBlob("nonce length".to_string()))?;

        let key = self.derive_key(password, salt)?;
        let plaintext = self.backend.aead_decrypt(&key, nonce, ciphertext)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("credential opened");

        codec::bytes_to_text(plaintext)
            .map_err(|e| VaultError::MalformedBlob(format!("plaintext is not UTF-8: {e}")))
    }
}
