//! APACHE II evaluation endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::parse_id;
use crate::api::error::{ApiError, ApiJson};
use crate::api::types::ApiContext;
use crate::models::Apache2Evaluacion;
use crate::registro::{self, Envio};
use crate::scoring::ClinicalMeasurementSet;

/// Measurements sit at the top level next to `usuarioId`, `pacienteRut`
/// and `fechaEvaluacion`.
#[derive(Deserialize)]
pub struct RegistrarApache2 {
    #[serde(flatten)]
    pub envio: Envio,
    #[serde(flatten)]
    pub mediciones: ClinicalMeasurementSet,
}

/// `POST /api/apache2`
pub async fn create(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<RegistrarApache2>,
) -> Result<(StatusCode, Json<Apache2Evaluacion>), ApiError> {
    let conn = ctx.open_db()?;
    let eval = registro::registrar_apache2(&conn, &ctx.tables, req.envio, req.mediciones)?;
    Ok((StatusCode::CREATED, Json(eval)))
}

/// `GET /api/apache2/:id`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Apache2Evaluacion>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.open_db()?;
    Ok(Json(registro::obtener_apache2(&conn, &id)?))
}

/// `GET /api/pacientes/:rut/apache2`: newest first.
pub async fn by_paciente(
    State(ctx): State<ApiContext>,
    Path(rut): Path<String>,
) -> Result<Json<Vec<Apache2Evaluacion>>, ApiError> {
    let conn = ctx.open_db()?;
    Ok(Json(registro::historial_apache2(&conn, &rut)?))
}
