//! The stored speech-API credential: one sealed blob under [`API_KEY_ENTRY`].

use std::sync::Arc;

use crate::{
    cipher::CredentialCipher, error::VaultError, rust_crypto::RustCryptoBackend,
    store::KeyValueStore, traits::CryptoBackend,
};

/// Key-value entry holding the sealed credential.
pub const API_KEY_ENTRY: &str = "apiKey";

/// Seals, persists and reopens the credential.
///
/// Key derivation is deliberately slow, so [`save`](Self::save) and
/// [`load`](Self::load) run the cipher on a blocking worker. Nothing is cached:
/// every `load` re-derives the key from the stored salt.
pub struct CredentialStore<B: CryptoBackend = RustCryptoBackend> {
    store: Arc<dyn KeyValueStore>,
    cipher: CredentialCipher<B>,
}

impl CredentialStore<RustCryptoBackend> {
    /// Credential store with the default cipher.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_cipher(store, CredentialCipher::new())
    }
}

impl<B: CryptoBackend + Clone + 'static> CredentialStore<B> {
    /// Credential store with a custom cipher.
    #[must_use]
    pub fn with_cipher(store: Arc<dyn KeyValueStore>, cipher: CredentialCipher<B>) -> Self {
        Self { store, cipher }
    }

    /// Whether a blob is present. Does not check that it opens.
    pub async fn exists(&self) -> Result<bool, VaultError> {
        Ok(self.store.get(API_KEY_ENTRY).await?.is_some())
    }

    /// Seal `secret` under `password` and replace any stored blob.
    pub async fn save(&self, secret: &str, password: &str) -> Result<(), VaultError> {
        let cipher = self.cipher.clone();
        let secret = secret.to_string();
        let password = password.to_string();
        let blob =
            tokio::task::spawn_blocking(move || cipher.encrypt(&secret, &password)).await??;

        self.store.set(API_KEY_ENTRY, &blob).await?;

        #[cfg(feature = "tracing")]
        tracing::info!("credential stored");

        Ok(())
    }

    /// The raw sealed blob, or [`VaultError::CredentialMissing`].
    pub async fn load_blob(&self) -> Result<String, VaultError> {
        self.store
            .get(API_KEY_ENTRY)
            .await?
            .ok_or(VaultError::CredentialMissing)
    }

    /// Load and open the stored credential.
    pub async fn load(&self, password: &str) -> Result<String, VaultError> {
        let blob = self.load_blob().await?;
        let cipher = self.cipher.clone();
        let password = password.to_string();

        let secret =
            tokio::task::spawn_blocking(move || cipher.decrypt(&blob, &password)).await?;

        #[cfg(feature = "tracing")]
        if let Err(ref e) = secret {
            tracing::warn!(error = %e, "stored credential could not be opened");
        }

        secret
    }

    /// Delete the stored blob.
    pub async fn clear(&self) -> Result<(), VaultError> {
        self.store.remove(API_KEY_ENTRY).await?;

        #[cfg(feature = "tracing")]
        tracing::info!("credential cleared");

        Ok(())
    }
}
