//! Severity and workload scoring engines.
//!
//! Four deterministic engines share one band lookup primitive:
//! 1. APACHE II: physiology + age + chronic health → mortality-risk band
//! 2. NAS: nursing activities checklist → workload band
//! 3. Kinesiology categorization: five ordinal domains → complexity band
//! 4. Burnout inventory: 22 Likert answers → three independent subscales
//!
//! Every clinical cut point lives in [`tables`]; engines receive a validated
//! [`ScoringTables`] and never fall back to default scores.

/// Band/label enum with `as_str` + `std::str::FromStr`. The serde name of
/// each variant is its label, so stored text and JSON always agree.
macro_rules! label_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        $(#[$meta])*
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::scoring::ScoringError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant),)+
                    _ => Err($crate::scoring::ScoringError::validation(
                        stringify!($name),
                        format!("unknown label {s:?}"),
                    )),
                }
            }
        }
    };
}

pub mod apache2;
pub mod band;
pub mod burnout;
pub mod kinesiologia;
pub mod nas;
pub mod tables;

pub use apache2::{compute_apache2, Apache2Result, ClinicalMeasurementSet, NivelRiesgo, TipoIngreso};
pub use band::{Band, BandTable};
pub use burnout::{compute_burnout, BurnoutResponseSet, BurnoutResult, NivelBurnout};
pub use kinesiologia::{compute_categorization, Complejidad, KinesiologyCategorization, KinesiologySubscores};
pub use nas::{compute_nas, CargaNas, NasChecklist, NasResult};
pub use tables::ScoringTables;

use thiserror::Error;

/// Errors raised by the scoring engines and their threshold tables.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Malformed or out-of-domain input. `field` names the offending
    /// field, question or exclusive group.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A numeric value fell outside every band of a table.
    #[error("Value {value} for {field} is outside every defined band")]
    OutOfRange { field: String, value: f64 },

    /// A threshold table is non-contiguous, overlapping or empty.
    #[error("Threshold table {table} is malformed: {message}")]
    Configuration { table: String, message: String },
}

impl ScoringError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ScoringError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The field, group or table this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ScoringError::Validation { field, .. } => field,
            ScoringError::OutOfRange { field, .. } => field,
            ScoringError::Configuration { table, .. } => table,
        }
    }
}
