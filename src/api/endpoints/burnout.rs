//! Burnout survey endpoints. Surveys belong to the responding staff
//! member, not to a patient.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use super::parse_id;
use crate::api::error::{ApiError, ApiJson};
use crate::api::types::ApiContext;
use crate::models::BurnoutEncuesta;
use crate::registro;
use crate::scoring::BurnoutResponseSet;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrarBurnout {
    pub usuario_id: Uuid,
    #[serde(default)]
    pub fecha_evaluacion: Option<NaiveDateTime>,
    pub respuestas: Vec<i32>,
}

/// `POST /api/burnout`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<RegistrarBurnout>,
) -> Result<(StatusCode, Json<BurnoutEncuesta>), ApiError> {
    let conn = ctx.open_db()?;
    let encuesta = registro::registrar_burnout(
        &conn,
        &ctx.tables,
        req.usuario_id,
        req.fecha_evaluacion,
        BurnoutResponseSet {
            respuestas: req.respuestas,
        },
    )?;
    Ok((StatusCode::CREATED, Json(encuesta)))
}

/// `GET /api/burnout/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<BurnoutEncuesta>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    Ok(Json(registro::obtener_burnout(&conn, &id)?))
}

/// `GET /api/usuarios/:id/burnout`
pub async fn by_usuario(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BurnoutEncuesta>>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    Ok(Json(registro::historial_burnout(&conn, &id)?))
}
