//! Hash-before-store for staff passwords.
//!
//! Callers hash explicitly with [`hash_password`] before handing a user to
//! the repository; nothing is hashed implicitly on insert or update.
//! Encoded form: `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>`.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::CryptoError;

pub const PBKDF2_ITERATIONS: u32 = 600_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;
pub const MIN_PASSWORD_LENGTH: usize = 8;

const SCHEME: &str = "pbkdf2-sha256";

/// A derived password hash with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub iterations: u32,
    pub salt: [u8; SALT_LENGTH],
    pub hash: [u8; HASH_LENGTH],
}

impl PasswordHash {
    pub fn encode(&self) -> String {
        format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(self.salt),
            STANDARD_NO_PAD.encode(self.hash),
        )
    }

    pub fn decode(encoded: &str) -> Result<Self, CryptoError> {
        let mut parts = encoded.split('$');
        let (Some(SCHEME), Some(iter), Some(salt), Some(hash), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(CryptoError::MalformedHash);
        };

        let iterations: u32 = iter.parse().map_err(|_| CryptoError::MalformedHash)?;
        let salt: [u8; SALT_LENGTH] = STANDARD_NO_PAD
            .decode(salt)
            .ok()
            .and_then(|v| v.try_into().ok())
            .ok_or(CryptoError::MalformedHash)?;
        let hash: [u8; HASH_LENGTH] = STANDARD_NO_PAD
            .decode(hash)
            .ok()
            .and_then(|v| v.try_into().ok())
            .ok_or(CryptoError::MalformedHash)?;

        if iterations == 0 {
            return Err(CryptoError::MalformedHash);
        }
        Ok(Self { iterations, salt, hash })
    }
}

fn derive(password: &str, salt: &[u8; SALT_LENGTH], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Generate a cryptographically random salt
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Hash a password with the default iteration count.
pub fn hash_password(password: &str) -> Result<PasswordHash, CryptoError> {
    hash_password_with_iterations(password, PBKDF2_ITERATIONS)
}

pub fn hash_password_with_iterations(
    password: &str,
    iterations: u32,
) -> Result<PasswordHash, CryptoError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CryptoError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    let salt = generate_salt();
    let hash = derive(password, &salt, iterations.max(1));
    Ok(PasswordHash {
        iterations: iterations.max(1),
        salt,
        hash,
    })
}

/// Constant-time check of `password` against a stored hash.
pub fn verify_password(password: &str, stored: &PasswordHash) -> bool {
    let candidate = derive(password, &stored.salt, stored.iterations);
    candidate.ct_eq(&stored.hash).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn correct_password_verifies() {
        let h = hash_password_with_iterations("enfermeria-uti", FAST).unwrap();
        assert!(verify_password("enfermeria-uti", &h));
    }

    #[test]
    fn wrong_password_rejected() {
        let h = hash_password_with_iterations("enfermeria-uti", FAST).unwrap();
        assert!(!verify_password("enfermeria-uci", &h));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password_with_iterations("password123", FAST).unwrap();
        let b = hash_password_with_iterations("password123", FAST).unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn short_password_rejected() {
        assert_eq!(
            hash_password_with_iterations("corta", FAST).unwrap_err(),
            CryptoError::PasswordTooShort { min: 8 }
        );
    }

    #[test]
    fn encode_decode_preserves_hash() {
        let h = hash_password_with_iterations("kinesiologia", FAST).unwrap();
        let encoded = h.encode();
        assert!(encoded.starts_with("pbkdf2-sha256$1000$"));
        let decoded = PasswordHash::decode(&encoded).unwrap();
        assert_eq!(decoded, h);
        assert!(verify_password("kinesiologia", &decoded));
    }

    #[test]
    fn malformed_encodings_rejected() {
        for bad in [
            "",
            "bcrypt$10$abc$def",
            "pbkdf2-sha256$x$AAAA$AAAA",
            "pbkdf2-sha256$1000$AAAA",
            "pbkdf2-sha256$0$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA",
        ] {
            assert_eq!(PasswordHash::decode(bad), Err(CryptoError::MalformedHash), "{bad}");
        }
    }

    #[test]
    fn default_iterations_match_constant() {
        assert_eq!(PBKDF2_ITERATIONS, 600_000);
    }
}
