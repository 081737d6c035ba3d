//! Kinesiology categorization endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::parse_id;
use crate::api::error::{ApiError, ApiJson};
use crate::api::types::ApiContext;
use crate::models::CategorizacionKinesiologia;
use crate::registro::{self, Envio};
use crate::scoring::KinesiologySubscores;

#[derive(Deserialize)]
pub struct RegistrarCategorizacion {
    #[serde(flatten)]
    pub envio: Envio,
    #[serde(flatten)]
    pub subpuntajes: KinesiologySubscores,
}

/// `POST /api/kinesiologia`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<RegistrarCategorizacion>,
) -> Result<(StatusCode, Json<CategorizacionKinesiologia>), ApiError> {
    let conn = ctx.open_db()?;
    let cat = registro::registrar_kinesiologia(&conn, &ctx.tables, req.envio, req.subpuntajes)?;
    Ok((StatusCode::CREATED, Json(cat)))
}

/// `GET /api/kinesiologia/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<CategorizacionKinesiologia>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    Ok(Json(registro::obtener_kinesiologia(&conn, &id)?))
}

/// `GET /api/pacientes/:rut/kinesiologia`
pub async fn by_paciente(
    State(ctx): State<ApiContext>,
    Path(rut): Path<String>,
) -> Result<Json<Vec<CategorizacionKinesiologia>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(registro::historial_kinesiologia(&conn, &rut)?))
}
