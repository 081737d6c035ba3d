//! Stateless previews: run an engine and return its result without
//! touching the database. Used by the client while a form is filled in.

use axum::extract::State;
use axum::Json;

use crate::api::error::{ApiError, ApiJson};
use crate::api::types::ApiContext;
use crate::scoring::{
    compute_apache2, compute_burnout, compute_categorization, compute_nas, Apache2Result,
    BurnoutResponseSet, BurnoutResult, ClinicalMeasurementSet, KinesiologyCategorization,
    KinesiologySubscores, NasChecklist, NasResult,
};

/// `POST /api/calcular/apache2`
pub async fn apache2(
    State(ctx): State<ApiContext>,
    ApiJson(mediciones): ApiJson<ClinicalMeasurementSet>,
) -> Result<Json<Apache2Result>, ApiError> {
    Ok(Json(compute_apache2(&ctx.tables, &mediciones)?))
}

/// `POST /api/calcular/nas`
pub async fn nas(
    State(ctx): State<ApiContext>,
    ApiJson(checklist): ApiJson<NasChecklist>,
) -> Result<Json<NasResult>, ApiError> {
    Ok(Json(compute_nas(&ctx.tables, &checklist)?))
}

/// `POST /api/calcular/kinesiologia`
pub async fn kinesiologia(
    State(ctx): State<ApiContext>,
    ApiJson(subpuntajes): ApiJson<KinesiologySubscores>,
) -> Result<Json<KinesiologyCategorization>, ApiError> {
    Ok(Json(compute_categorization(&ctx.tables, &subpuntajes)?))
}

/// `POST /api/calcular/burnout`
pub async fn burnout(
    State(ctx): State<ApiContext>,
    ApiJson(respuestas): ApiJson<BurnoutResponseSet>,
) -> Result<Json<BurnoutResult>, ApiError> {
    Ok(Json(compute_burnout(&ctx.tables, &respuestas)?))
}
