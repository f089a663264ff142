//! PBKDF2-HMAC-SHA256 key derivation for password → AES key.

use {sha2::Sha256, zeroize::Zeroizing};

use crate::error::VaultError;

/// Fixed PBKDF2 iteration count for stored credentials.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Derived key length (AES-256).
pub const KEY_LEN: usize = 32;

/// Derive a 256-bit key from a password and salt using PBKDF2-HMAC-SHA256.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, VaultError> {
    if iterations == 0 {
        return Err(VaultError::CryptoUnavailable(
            "PBKDF2 iteration count must be positive".to_string(),
        ));
    }

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, output.as_mut());
    Ok(output)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[test]
    fn matches_published_vectors() {
        let key = derive_key(b"password", b"salt", 1).unwrap();
        assert_eq!(
            hex(key.as_ref()),
            "120fb6cffcf8b32c43e7225256c4f837a86548c92ccc35480805987cb70be17b"
        );

        let key = derive_key(b"password", b"salt", 2).unwrap();
        assert_eq!(
            hex(key.as_ref()),
            "ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43"
        );
    }

    #[test]
    fn derive_key_deterministic() {
        let salt = b"test-salt-16byte";

        let key1 = derive_key(b"password", salt, 1_000).unwrap();
        let key2 = derive_key(b"password", salt, 1_000).unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn different_passwords_different_keys() {
        let salt = b"test-salt-16byte";

        let key1 = derive_key(b"password1", salt, 1_000).unwrap();
        let key2 = derive_key(b"password2", salt, 1_000).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_salts_different_keys() {
        let key1 = derive_key(b"password", b"salt-aaaaaaaaaaaa", 1_000).unwrap();
        let key2 = derive_key(b"password", b"salt-bbbbbbbbbbbb", 1_000).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn zero_iterations_rejected() {
        let result = derive_key(b"password", b"salt", 0);
        assert!(matches!(result, Err(VaultError::CryptoUnavailable(_))));
    }
}
