//! Nursing Activities Score endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::parse_id;
use crate::api::error::{ApiError, ApiJson};
use crate::api::types::ApiContext;
use crate::models::NasEvaluacion;
use crate::registro::{self, Envio};
use crate::scoring::NasChecklist;

#[derive(Deserialize)]
pub struct RegistrarNas {
    #[serde(flatten)]
    pub envio: Envio,
    #[serde(flatten)]
    pub checklist: NasChecklist,
    #[serde(default)]
    pub observaciones: Option<String>,
}

/// `POST /api/nas`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<RegistrarNas>,
) -> Result<(StatusCode, Json<NasEvaluacion>), ApiError> {
    let conn = ctx.open_db()?;
    let eval = registro::registrar_nas(
        &conn,
        &ctx.tables,
        req.envio,
        req.checklist,
        req.observaciones,
    )?;
    Ok((StatusCode::CREATED, Json(eval)))
}

/// `GET /api/nas/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<NasEvaluacion>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    Ok(Json(registro::obtener_nas(&conn, &id)?))
}

/// `GET /api/pacientes/:rut/nas`
pub async fn by_paciente(
    State(ctx): State<ApiContext>,
    Path(rut): Path<String>,
) -> Result<Json<Vec<NasEvaluacion>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(registro::historial_nas(&conn, &rut)?))
}
