//! Endpoint handlers, one module per resource.

pub mod apache2;
pub mod burnout;
pub mod calcular;
pub mod health;
pub mod kinesiologia;
pub mod nas;
pub mod pacientes;
pub mod usuarios;

use uuid::Uuid;

use crate::api::error::ApiError;

/// Parse a UUID path segment.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|e| ApiError::BadRequest(format!("Invalid ID: {e}")))
}
