//! Password-protected storage for the speech API credential.
//!
//! The credential is sealed with AES-256-GCM under a key stretched from a
//! caller-supplied password via PBKDF2-HMAC-SHA256. Salt and nonce are fresh
//! for every encryption and travel inside the blob, so decryption needs only
//! the blob and the password. Primitives sit behind the [`CryptoBackend`]
//! trait and persistence behind [`KeyValueStore`].

pub mod cipher;
pub mod credential;
pub mod error;
pub mod kdf;
pub mod rust_crypto;
pub mod store;
pub mod traits;

pub use {
    cipher::CredentialCipher,
    credential::{API_KEY_ENTRY, CredentialStore},
    error::VaultError,
    rust_crypto::RustCryptoBackend,
    store::{KeyValueStore, MemoryStore, SqliteStore},
    traits::CryptoBackend,
};

/// Run database migrations for the vault crate.
///
/// Creates the `kv_store` table used by [`SqliteStore`].
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<(), VaultError> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
