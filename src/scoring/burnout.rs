//! Burnout inventory (Maslach-style, 22 items on a 0–6 scale).
//!
//! Three subscales are summed from disjoint question groups and banded with
//! their own cut points. There is no combined total.

use serde::{Deserialize, Serialize};

use super::band::BandTable;
use super::tables::{ScoringTables, BURNOUT_RESPUESTA_MAX, BURNOUT_RESPUESTA_MIN};
use super::ScoringError;

pub const NUM_PREGUNTAS: usize = 22;

/// Question numbers (1-based) per subscale.
pub const AGOTAMIENTO_EMOCIONAL: [usize; 9] = [1, 2, 3, 6, 8, 13, 14, 16, 20];
pub const DESPERSONALIZACION: [usize; 5] = [5, 10, 11, 15, 22];
pub const REALIZACION_PERSONAL: [usize; 8] = [4, 7, 9, 12, 17, 18, 19, 21];

label_enum!(NivelBurnout {
    Bajo => "bajo",
    Medio => "medio",
    Alto => "alto",
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnoutResponseSet {
    /// Answers in question order; index 0 is question 1.
    pub respuestas: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subescala {
    pub puntaje: u32,
    pub nivel: NivelBurnout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutResult {
    pub agotamiento_emocional: Subescala,
    pub despersonalizacion: Subescala,
    pub realizacion_personal: Subescala,
}

fn subescala(
    respuestas: &[i32],
    preguntas: &[usize],
    tabla: &BandTable<NivelBurnout>,
) -> Result<Subescala, ScoringError> {
    // Answers are range-checked before this point, so each is 0..=6.
    let puntaje: u32 = preguntas
        .iter()
        .map(|&q| respuestas[q - 1].unsigned_abs())
        .sum();
    let nivel = tabla.points(f64::from(puntaje))?;
    Ok(Subescala { puntaje, nivel })
}

pub fn compute_burnout(
    tables: &ScoringTables,
    responses: &BurnoutResponseSet,
) -> Result<BurnoutResult, ScoringError> {
    let respuestas = &responses.respuestas;
    if respuestas.len() != NUM_PREGUNTAS {
        return Err(ScoringError::validation(
            "respuestas",
            format!("expected {NUM_PREGUNTAS} answers, got {}", respuestas.len()),
        ));
    }
    for (i, &r) in respuestas.iter().enumerate() {
        if !(BURNOUT_RESPUESTA_MIN..=BURNOUT_RESPUESTA_MAX).contains(&r) {
            return Err(ScoringError::validation(
                format!("pregunta_{}", i + 1),
                format!(
                    "answer {r} outside {BURNOUT_RESPUESTA_MIN}..={BURNOUT_RESPUESTA_MAX}"
                ),
            ));
        }
    }

    let t = &tables.burnout;
    Ok(BurnoutResult {
        agotamiento_emocional: subescala(respuestas, &AGOTAMIENTO_EMOCIONAL, &t.agotamiento_emocional)?,
        despersonalizacion: subescala(respuestas, &DESPERSONALIZACION, &t.despersonalizacion)?,
        realizacion_personal: subescala(respuestas, &REALIZACION_PERSONAL, &t.realizacion_personal)?,
    })
}
