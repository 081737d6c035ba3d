//! Stored evaluation records. Each pairs the submitted inputs with the
//! engine output computed at submission time; records are never updated.
//! Patient-scale records may be scored without an admitted patient, in
//! which case `paciente_rut` is `None`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::{
    Apache2Result, BurnoutResponseSet, BurnoutResult, ClinicalMeasurementSet,
    KinesiologyCategorization, KinesiologySubscores, NasChecklist, NasResult,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apache2Evaluacion {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub paciente_rut: Option<String>,
    pub fecha_evaluacion: NaiveDateTime,
    pub mediciones: ClinicalMeasurementSet,
    pub resultado: Apache2Result,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NasEvaluacion {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub paciente_rut: Option<String>,
    pub fecha_evaluacion: NaiveDateTime,
    pub checklist: NasChecklist,
    pub resultado: NasResult,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizacionKinesiologia {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub paciente_rut: Option<String>,
    pub fecha_evaluacion: NaiveDateTime,
    pub subpuntajes: KinesiologySubscores,
    pub resultado: KinesiologyCategorization,
}

/// Burnout surveys describe the respondent, not a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutEncuesta {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub fecha_evaluacion: NaiveDateTime,
    pub respuestas: BurnoutResponseSet,
    pub resultado: BurnoutResult,
}
