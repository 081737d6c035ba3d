pub mod password;

pub use password::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Password must have at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("Stored password hash is malformed")]
    MalformedHash,
}
