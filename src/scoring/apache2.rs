//! APACHE II severity score.
//!
//! Twelve physiological variables, age and chronic health are mapped to
//! points through [`Apache2Tables`](super::tables::Apache2Tables) and summed;
//! the total is then banded into a mortality-risk level.

use serde::{Deserialize, Serialize};

use super::tables::{
    ScoringTables, FIO2_UMBRAL_GRADIENTE, PUNTOS_CRONICO_ELECTIVO, PUNTOS_CRONICO_NO_ELECTIVO,
};
use super::ScoringError;

label_enum!(
    /// Admission context that drives the chronic-health points.
    TipoIngreso {
        NoQuirurgico => "noQuirurgico",
        UrgenciaQuirurgica => "urgenciaQuirurgica",
        ElectivoQuirurgico => "electivoQuirurgico",
    }
);

label_enum!(
    /// Mortality-risk band derived from the APACHE II total.
    NivelRiesgo {
        Bajo => "bajo",
        Moderado => "moderado",
        Alto => "alto",
        Critico => "critico",
    }
);

/// APACHE II input. Fields are optional at the type level so a missing
/// value is reported by name instead of as a generic decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalMeasurementSet {
    /// Core temperature, °C.
    pub temperatura: Option<f64>,
    /// Mean arterial pressure, mmHg.
    pub presion_arterial_media: Option<f64>,
    pub frecuencia_cardiaca: Option<f64>,
    pub frecuencia_respiratoria: Option<f64>,
    /// PaO2 (mmHg), or A-aDO2 when `fio2 >= 0.5`.
    pub oxigenacion: Option<f64>,
    /// Inspired oxygen fraction, 0–1. Absent means room air.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fio2: Option<f64>,
    pub ph_arterial: Option<f64>,
    /// Serum sodium, mEq/L.
    pub sodio: Option<f64>,
    /// Serum potassium, mEq/L.
    pub potasio: Option<f64>,
    /// Serum creatinine, mg/dL.
    pub creatinina: Option<f64>,
    #[serde(default)]
    pub insuficiencia_renal_aguda: bool,
    /// Hematocrit, %.
    pub hematocrito: Option<f64>,
    /// White blood cell count, x1000/mm3.
    pub leucocitos: Option<f64>,
    /// Glasgow coma scale, 3–15.
    pub glasgow: Option<f64>,
    /// Age in years.
    pub edad: Option<f64>,
    pub enfermedad_cronica: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_ingreso: Option<TipoIngreso>,
}

/// The fourteen APACHE II contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Parametro {
    Temperatura,
    PresionArterialMedia,
    FrecuenciaCardiaca,
    FrecuenciaRespiratoria,
    Oxigenacion,
    PhArterial,
    Sodio,
    Potasio,
    Creatinina,
    Hematocrito,
    Leucocitos,
    Glasgow,
    Edad,
    EnfermedadCronica,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribucion {
    pub parametro: Parametro,
    pub puntos: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apache2Result {
    pub contribuciones: Vec<Contribucion>,
    pub puntaje_total: u32,
    pub nivel_riesgo: NivelRiesgo,
    pub mortalidad_estimada: Option<String>,
}

fn require(value: Option<f64>, field: &str) -> Result<f64, ScoringError> {
    match value {
        None => Err(ScoringError::validation(field, "value is required")),
        Some(v) if !v.is_finite() => Err(ScoringError::validation(field, "value must be a finite number")),
        Some(v) => Ok(v),
    }
}

/// Compute the APACHE II score for one measurement set.
pub fn compute_apache2(
    tables: &ScoringTables,
    m: &ClinicalMeasurementSet,
) -> Result<Apache2Result, ScoringError> {
    let t = &tables.apache2;

    let temperatura = require(m.temperatura, "temperatura")?;
    let pam = require(m.presion_arterial_media, "presionArterialMedia")?;
    let fc = require(m.frecuencia_cardiaca, "frecuenciaCardiaca")?;
    let fr = require(m.frecuencia_respiratoria, "frecuenciaRespiratoria")?;
    let oxigenacion = require(m.oxigenacion, "oxigenacion")?;
    let ph = require(m.ph_arterial, "phArterial")?;
    let sodio = require(m.sodio, "sodio")?;
    let potasio = require(m.potasio, "potasio")?;
    let creatinina = require(m.creatinina, "creatinina")?;
    let hematocrito = require(m.hematocrito, "hematocrito")?;
    let leucocitos = require(m.leucocitos, "leucocitos")?;
    let glasgow = require(m.glasgow, "glasgow")?;
    let edad = require(m.edad, "edad")?;
    let cronica = m
        .enfermedad_cronica
        .ok_or_else(|| ScoringError::validation("enfermedadCronica", "value is required"))?;

    if glasgow.fract() != 0.0 {
        return Err(ScoringError::validation("glasgow", "must be a whole number"));
    }

    let oxigenacion_tabla = match m.fio2 {
        Some(f) if !f.is_finite() || f <= 0.0 || f > 1.0 => {
            return Err(ScoringError::validation("fio2", "must be a fraction in (0, 1]"));
        }
        Some(f) if f >= FIO2_UMBRAL_GRADIENTE => &t.gradiente_aa,
        _ => &t.pao2,
    };

    let creatinina_puntos = t.creatinina.points(creatinina)?;
    let creatinina_puntos = if m.insuficiencia_renal_aguda {
        creatinina_puntos * 2
    } else {
        creatinina_puntos
    };

    let cronica_puntos = if cronica {
        match m.tipo_ingreso {
            Some(TipoIngreso::ElectivoQuirurgico) => PUNTOS_CRONICO_ELECTIVO,
            Some(TipoIngreso::NoQuirurgico) | Some(TipoIngreso::UrgenciaQuirurgica) => {
                PUNTOS_CRONICO_NO_ELECTIVO
            }
            None => {
                return Err(ScoringError::validation(
                    "tipoIngreso",
                    "required when enfermedadCronica is true",
                ));
            }
        }
    } else {
        0
    };

    let contribuciones = vec![
        Contribucion { parametro: Parametro::Temperatura, puntos: t.temperatura.points(temperatura)? },
        Contribucion { parametro: Parametro::PresionArterialMedia, puntos: t.presion_arterial_media.points(pam)? },
        Contribucion { parametro: Parametro::FrecuenciaCardiaca, puntos: t.frecuencia_cardiaca.points(fc)? },
        Contribucion { parametro: Parametro::FrecuenciaRespiratoria, puntos: t.frecuencia_respiratoria.points(fr)? },
        Contribucion { parametro: Parametro::Oxigenacion, puntos: oxigenacion_tabla.points(oxigenacion)? },
        Contribucion { parametro: Parametro::PhArterial, puntos: t.ph_arterial.points(ph)? },
        Contribucion { parametro: Parametro::Sodio, puntos: t.sodio.points(sodio)? },
        Contribucion { parametro: Parametro::Potasio, puntos: t.potasio.points(potasio)? },
        Contribucion { parametro: Parametro::Creatinina, puntos: creatinina_puntos },
        Contribucion { parametro: Parametro::Hematocrito, puntos: t.hematocrito.points(hematocrito)? },
        Contribucion { parametro: Parametro::Leucocitos, puntos: t.leucocitos.points(leucocitos)? },
        Contribucion { parametro: Parametro::Glasgow, puntos: t.glasgow.points(glasgow)? },
        Contribucion { parametro: Parametro::Edad, puntos: t.edad.points(edad)? },
        Contribucion { parametro: Parametro::EnfermedadCronica, puntos: cronica_puntos },
    ];

    let puntaje_total: u32 = contribuciones.iter().map(|c| u32::from(c.puntos)).sum();
    let nivel_riesgo = t.nivel_riesgo.points(f64::from(puntaje_total))?;
    let mortalidad_estimada = Some(t.mortalidad.points(f64::from(puntaje_total))?.to_string());

    Ok(Apache2Result {
        contribuciones,
        puntaje_total,
        nivel_riesgo,
        mortalidad_estimada,
    })
}
