//! API error types with structured JSON responses.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::crypto::CryptoError;
use crate::db::DatabaseError;
use crate::registro::RegistroError;
use crate::rut::RutError;
use crate::scoring::ScoringError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid {field:?}: {message}")]
    Validation {
        field: Option<String>,
        message: String,
    },
    #[error("Out of range: {message}")]
    OutOfRange { field: String, message: String },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field) = match self {
            ApiError::Validation { field, message } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message, field)
            }
            ApiError::OutOfRange { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "OUT_OF_RANGE",
                message,
                Some(field),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail, None),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "CONFLICT", detail, None),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail, None)
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                field,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ScoringError> for ApiError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Validation { field, message } => ApiError::Validation {
                field: Some(field),
                message,
            },
            ScoringError::OutOfRange { ref field, .. } => ApiError::OutOfRange {
                field: field.clone(),
                message: err.to_string(),
            },
            ScoringError::Configuration { .. } => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity_type, id } => {
                ApiError::NotFound(format!("{entity_type} {id} not found"))
            }
            DatabaseError::ConstraintViolation(detail) => ApiError::Conflict(detail),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<RutError> for ApiError {
    fn from(err: RutError) -> Self {
        ApiError::Validation {
            field: Some("rut".into()),
            message: err.to_string(),
        }
    }
}

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::PasswordTooShort { .. } => ApiError::Validation {
                field: Some("password".into()),
                message: err.to_string(),
            },
            CryptoError::MalformedHash => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<RegistroError> for ApiError {
    fn from(err: RegistroError) -> Self {
        match err {
            RegistroError::Scoring(e) => e.into(),
            RegistroError::Database(e) => e.into(),
            RegistroError::Rut(e) => e.into(),
            RegistroError::Crypto(e) => e.into(),
            RegistroError::Validation { field, message } => ApiError::Validation {
                field: Some(field),
                message,
            },
            RegistroError::UsuarioNoEncontrado(id) => {
                ApiError::NotFound(format!("Usuario {id} not found"))
            }
            RegistroError::PacienteNoEncontrado(rut) => {
                ApiError::NotFound(format!("Paciente {rut} not found"))
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// `Json` extractor whose rejections use the structured error body.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn scoring_validation_returns_400_with_field() {
        let err: ApiError = ScoringError::Validation {
            field: "grupo 1".into(),
            message: "items item_1a, item_1b are mutually exclusive".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["field"], "grupo 1");
    }

    #[tokio::test]
    async fn out_of_range_returns_422() {
        let err: ApiError = ScoringError::OutOfRange {
            field: "temperatura".into(),
            value: f64::NAN,
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "OUT_OF_RANGE");
        assert_eq!(json["error"]["field"], "temperatura");
    }

    #[tokio::test]
    async fn configuration_error_is_hidden() {
        let err: ApiError = ScoringError::Configuration {
            table: "sodio".into(),
            message: "gap between bands".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
        assert!(json["error"].get("field").is_none());
    }

    #[tokio::test]
    async fn constraint_violation_returns_409() {
        let err: ApiError = DatabaseError::ConstraintViolation("cama: UNIQUE".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn missing_entity_returns_404() {
        let err: ApiError = RegistroError::PacienteNoEncontrado("12345678-5".into()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn bad_rut_is_validation_on_rut() {
        let err: ApiError = RutError::Formato("abc".into()).into();
        let json = body_json(err.into_response()).await;
        assert_eq!(json["error"]["field"], "rut");
    }

    #[tokio::test]
    async fn short_password_is_validation_on_password() {
        let err: ApiError = CryptoError::PasswordTooShort { min: 8 }.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["field"], "password");
    }
}
