//! Patient endpoints.
//!
//! - `POST /api/pacientes`: admit
//! - `GET /api/pacientes`: census, ordered by bed
//! - `GET /api/pacientes/:rut`: detail
//! - `PUT /api/pacientes/:rut/cama`: assign or release a bed

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::{ApiError, ApiJson};
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{NuevoPaciente, Paciente};
use crate::registro;

pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(nuevo): ApiJson<NuevoPaciente>,
) -> Result<(StatusCode, Json<Paciente>), ApiError> {
    let conn = ctx.open_db()?;
    let paciente = registro::registrar_paciente(&conn, nuevo)?;
    Ok((StatusCode::CREATED, Json(paciente)))
}

pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Paciente>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(db::list_pacientes(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(rut): Path<String>,
) -> Result<Json<Paciente>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(registro::obtener_paciente(&conn, &rut)?))
}

#[derive(Deserialize)]
pub struct CamaRequest {
    pub cama: Option<String>,
}

pub async fn update_cama(
    State(ctx): State<ApiContext>,
    Path(rut): Path<String>,
    ApiJson(req): ApiJson<CamaRequest>,
) -> Result<Json<Paciente>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(registro::asignar_cama(&conn, &rut, req.cama.as_deref())?))
}
