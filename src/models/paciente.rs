use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A patient admitted to the unit, keyed by normalised RUT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paciente {
    pub rut: String,
    pub nombre: String,
    pub cama: Option<String>,
    pub fecha_ingreso: NaiveDate,
    pub diagnostico: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoPaciente {
    pub rut: String,
    pub nombre: String,
    #[serde(default)]
    pub cama: Option<String>,
    pub fecha_ingreso: NaiveDate,
    #[serde(default)]
    pub diagnostico: Option<String>,
}
