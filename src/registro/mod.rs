//! Write-side operations: staff registration, patient admission and the
//! four evaluation workflows. Each operation checks referenced entities,
//! runs the engine and stores the outcome as one insert.

pub mod evaluaciones;
pub mod pacientes;
pub mod usuarios;

use thiserror::Error;
use uuid::Uuid;

use crate::crypto::CryptoError;
use crate::db::DatabaseError;
use crate::rut::RutError;
use crate::scoring::ScoringError;

pub use evaluaciones::*;
pub use pacientes::*;
pub use usuarios::*;

#[derive(Error, Debug)]
pub enum RegistroError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Rut(#[from] RutError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Usuario not found: {0}")]
    UsuarioNoEncontrado(Uuid),

    #[error("Paciente not found: {0}")]
    PacienteNoEncontrado(String),
}

impl RegistroError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        RegistroError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Trimmed, non-empty text or a validation error naming the field.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String, RegistroError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RegistroError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
