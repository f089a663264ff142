//! Vault error types.

/// Errors produced by vault operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// Nothing is stored under the credential entry.
    #[error("no credential stored")]
    CredentialMissing,

    /// The stored blob is not valid base64, is too short, or holds non-UTF-8 plaintext.
    #[error("malformed credential blob: {0}")]
    MalformedBlob(String),

    /// The authentication tag did not verify: wrong password or a tampered blob.
    #[error("credential authentication failed")]
    AuthenticationFailed,

    /// The random source or cipher primitives could not be used.
    #[error("cryptography unavailable: {0}")]
    CryptoUnavailable(String),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The blocking worker running a crypto operation panicked or was cancelled.
    #[error("crypto task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
