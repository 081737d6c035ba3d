//! Staff user endpoints.
//!
//! - `POST /api/usuarios`: register (password hashed before storage)
//! - `GET /api/usuarios`: list
//! - `GET /api/usuarios/:id`: detail

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::parse_id;
use crate::api::error::{ApiError, ApiJson};
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{NuevoUsuario, Usuario};
use crate::registro;

/// `POST /api/usuarios`. Hashing runs off the async executor.
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(nuevo): ApiJson<NuevoUsuario>,
) -> Result<(StatusCode, Json<Usuario>), ApiError> {
    let usuario = tokio::task::spawn_blocking(move || -> Result<Usuario, ApiError> {
        let conn = ctx.open_db()?;
        Ok(registro::registrar_usuario(&conn, nuevo, ctx.pbkdf2_iterations)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Registration task failed: {e}")))??;

    Ok((StatusCode::CREATED, Json(usuario)))
}

/// `GET /api/usuarios`
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Usuario>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(db::list_usuarios(&conn)?))
}

/// `GET /api/usuarios/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Usuario>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    Ok(Json(registro::obtener_usuario(&conn, &id)?))
}
