//! Argon2id password hashing and verification.
//!
//! Hashes are stored as `base64(salt):base64(hash)` using the unpadded
//! standard alphabet. Cost parameters are fixed; changing them means
//! re-hashing every provisioned credential.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use constant_time_eq::constant_time_eq;

use dirview_core::error::AppError;
use dirview_core::result::AppResult;

use crate::error::AuthError;

/// Salt length in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Argon2 passes over memory.
const ARGON2_TIME_COST: u32 = 1;
/// Argon2 working set in KiB (64 MiB).
const ARGON2_MEMORY_KIB: u32 = 64 * 1024;
/// Argon2 lanes.
const ARGON2_PARALLELISM: u32 = 4;
/// Derived key length in bytes.
const HASH_LEN: usize = 32;

/// Handles password hashing and verification using Argon2id.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Draws a fresh random salt from the operating system.
    ///
    /// A failing secure random source is not retried; callers treat
    /// [`AuthError::Entropy`] as fatal.
    pub fn generate_salt(&self) -> Result<[u8; SALT_LEN], AuthError> {
        let mut salt = [0u8; SALT_LEN];
        fill_random(&mut salt)?;
        Ok(salt)
    }

    /// Derives the encoded hash of `password` under `salt`.
    pub fn hash(&self, password: &str, salt: &[u8]) -> AppResult<String> {
        let hash = derive(password.as_bytes(), salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(format!(
            "{}:{}",
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(hash)
        ))
    }

    /// Hashes `password` under a freshly generated salt.
    pub fn hash_new(&self, password: &str) -> AppResult<String> {
        let salt = self.generate_salt()?;
        self.hash(password, &salt)
    }

    /// Verifies `password` against an encoded hash.
    ///
    /// Malformed input (no separator, bad base64, a salt the KDF refuses)
    /// yields `false`, indistinguishable from a wrong password.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        let Some((salt_b64, hash_b64)) = encoded.split_once(':') else {
            return false;
        };
        let Ok(salt) = STANDARD_NO_PAD.decode(salt_b64) else {
            return false;
        };
        let Ok(expected) = STANDARD_NO_PAD.decode(hash_b64) else {
            return false;
        };

        match derive(password.as_bytes(), &salt) {
            Ok(computed) => constant_time_eq(&expected, &computed),
            Err(_) => false,
        }
    }

    /// Probes the secure random source once. Run at startup so an
    /// unavailable source stops the process before it serves logins.
    pub fn ensure_entropy(&self) -> Result<(), AuthError> {
        let mut probe = [0u8; SALT_LEN];
        fill_random(&mut probe)
    }
}

/// Fills `buf` from the operating system CSPRNG.
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<(), AuthError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| AuthError::Entropy(e.to_string()))
}

fn derive(password: &[u8], salt: &[u8]) -> Result<[u8; HASH_LEN], argon2::Error> {
    let params = Params::new(
        ARGON2_MEMORY_KIB,
        ARGON2_TIME_COST,
        ARGON2_PARALLELISM,
        Some(HASH_LEN),
    )?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = [0u8; HASH_LEN];
    argon2.hash_password_into(password, salt, &mut out)?;
    Ok(out)
}

/// Returns true if `encoded` has the `base64(salt):base64(hash)` shape.
/// Does not run the KDF.
pub fn is_well_formed(encoded: &str) -> bool {
    let Some((salt_b64, hash_b64)) = encoded.split_once(':') else {
        return false;
    };
    matches!(
        (STANDARD_NO_PAD.decode(salt_b64), STANDARD_NO_PAD.decode(hash_b64)),
        (Ok(salt), Ok(hash)) if !salt.is_empty() && !hash.is_empty()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE_HASH: &str = "yJg3w0gbQpVei0eHpVQJ9Q:Vm7sOUeOYCRxoye3oyFnOEXnOzmTiDAb2JzD4YYUEkA";

    #[test]
    fn test_hash_then_verify() {
        let hasher = PasswordHasher::new();
        let salt = hasher.generate_salt().unwrap();
        let encoded = hasher.hash("correct horse", &salt).unwrap();

        assert!(hasher.verify("correct horse", &encoded));
        assert!(!hasher.verify("correct horsf", &encoded));
        assert!(!hasher.verify("", &encoded));
    }

    #[test]
    fn test_encoded_form() {
        let hasher = PasswordHasher::new();
        let encoded = hasher.hash("pw", &[7u8; SALT_LEN]).unwrap();
        let (salt, hash) = encoded.split_once(':').unwrap();

        assert_eq!(STANDARD_NO_PAD.decode(salt).unwrap(), vec![7u8; SALT_LEN]);
        assert_eq!(STANDARD_NO_PAD.decode(hash).unwrap().len(), HASH_LEN);
        assert!(!encoded.contains('='));
        assert!(is_well_formed(&encoded));
    }

    #[test]
    fn test_same_salt_is_deterministic() {
        let hasher = PasswordHasher::new();
        let salt = [42u8; SALT_LEN];
        assert_eq!(
            hasher.hash("pw", &salt).unwrap(),
            hasher.hash("pw", &salt).unwrap()
        );
    }

    #[test]
    fn test_provisioned_hash_verifies() {
        let hasher = PasswordHasher::new();
        assert!(hasher.verify("password", ALICE_HASH));
        assert!(!hasher.verify("Password", ALICE_HASH));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        let hasher = PasswordHasher::new();
        for encoded in [
            "",
            "no-separator-here",
            "!!!:AAAA",
            "AAAAAAAAAAAAAAAAAAAAAA:***",
            "AAAA:AAAA",
            "yJg3w0gbQpVei0eHpVQJ9Q==:Vm7sOUeOYCRxoye3oyFnOEXnOzmTiDAb2JzD4YYUEkA",
        ] {
            assert!(!hasher.verify("password", encoded), "accepted {encoded:?}");
        }
    }

    #[test]
    fn test_salts_differ() {
        let hasher = PasswordHasher::new();
        assert_ne!(
            hasher.generate_salt().unwrap(),
            hasher.generate_salt().unwrap()
        );
        assert!(hasher.ensure_entropy().is_ok());
    }

    #[test]
    fn test_is_well_formed() {
        assert!(is_well_formed(ALICE_HASH));
        assert!(!is_well_formed("plaintext"));
        assert!(!is_well_formed(":"));
        assert!(!is_well_formed("AAAA:"));
    }
}
