use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Deserialize;
use uuid::Uuid;

use super::RegistroError;
use crate::db::{self, now_timestamp, whole_seconds};
use crate::models::*;
use crate::rut;
use crate::scoring::{
    compute_apache2, compute_burnout, compute_categorization, compute_nas, BurnoutResponseSet,
    ClinicalMeasurementSet, KinesiologySubscores, NasChecklist, ScoringTables,
};

fn require_usuario(conn: &Connection, usuario_id: &Uuid) -> Result<(), RegistroError> {
    if db::usuario_exists(conn, usuario_id)? {
        Ok(())
    } else {
        Err(RegistroError::UsuarioNoEncontrado(*usuario_id))
    }
}

/// Normalise the RUT and confirm the patient is admitted.
fn require_paciente(conn: &Connection, rut_raw: &str) -> Result<String, RegistroError> {
    let rut = rut::normalizar(rut_raw)?;
    if db::paciente_exists(conn, &rut)? {
        Ok(rut)
    } else {
        Err(RegistroError::PacienteNoEncontrado(rut))
    }
}

/// Who submitted an evaluation, for which patient, and when.
///
/// The patient is optional; a blank RUT counts as absent. Without a
/// `fecha_evaluacion` the submission time is used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envio {
    pub usuario_id: Uuid,
    #[serde(default)]
    pub paciente_rut: Option<String>,
    #[serde(default)]
    pub fecha_evaluacion: Option<NaiveDateTime>,
}

impl Envio {
    pub fn new(usuario_id: Uuid) -> Self {
        Self {
            usuario_id,
            paciente_rut: None,
            fecha_evaluacion: None,
        }
    }

    pub fn paciente(mut self, rut: &str) -> Self {
        self.paciente_rut = Some(rut.to_string());
        self
    }

    pub fn fecha(mut self, fecha: NaiveDateTime) -> Self {
        self.fecha_evaluacion = Some(fecha);
        self
    }
}

/// Validated submission: user exists, patient (if any) is admitted.
struct Autoria {
    usuario_id: Uuid,
    paciente_rut: Option<String>,
    fecha_evaluacion: NaiveDateTime,
}

fn resolver_envio(conn: &Connection, envio: Envio) -> Result<Autoria, RegistroError> {
    require_usuario(conn, &envio.usuario_id)?;
    let paciente_rut = match envio.paciente_rut.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(require_paciente(conn, raw)?),
        _ => None,
    };
    Ok(Autoria {
        usuario_id: envio.usuario_id,
        paciente_rut,
        fecha_evaluacion: envio.fecha_evaluacion.map_or_else(now_timestamp, whole_seconds),
    })
}

// ═══════════════════════════════════════════════════════════
// APACHE II
// ═══════════════════════════════════════════════════════════

pub fn registrar_apache2(
    conn: &Connection,
    tables: &ScoringTables,
    envio: Envio,
    mediciones: ClinicalMeasurementSet,
) -> Result<Apache2Evaluacion, RegistroError> {
    let autoria = resolver_envio(conn, envio)?;
    let resultado = compute_apache2(tables, &mediciones)?;

    let eval = Apache2Evaluacion {
        id: Uuid::new_v4(),
        usuario_id: autoria.usuario_id,
        paciente_rut: autoria.paciente_rut,
        fecha_evaluacion: autoria.fecha_evaluacion,
        mediciones,
        resultado,
    };
    db::insert_apache2(conn, &eval)?;

    tracing::info!(
        id = %eval.id,
        puntaje = eval.resultado.puntaje_total,
        nivel = eval.resultado.nivel_riesgo.as_str(),
        "APACHE II evaluation stored"
    );
    Ok(eval)
}

pub fn obtener_apache2(conn: &Connection, id: &Uuid) -> Result<Apache2Evaluacion, RegistroError> {
    db::get_apache2(conn, id)?.ok_or_else(|| not_found("Apache2Evaluacion", id))
}

pub fn historial_apache2(conn: &Connection, rut_raw: &str) -> Result<Vec<Apache2Evaluacion>, RegistroError> {
    let rut = require_paciente(conn, rut_raw)?;
    Ok(db::list_apache2_by_paciente(conn, &rut)?)
}

// ═══════════════════════════════════════════════════════════
// NAS
// ═══════════════════════════════════════════════════════════

pub fn registrar_nas(
    conn: &Connection,
    tables: &ScoringTables,
    envio: Envio,
    checklist: NasChecklist,
    observaciones: Option<String>,
) -> Result<NasEvaluacion, RegistroError> {
    let autoria = resolver_envio(conn, envio)?;
    let resultado = compute_nas(tables, &checklist)?;

    let eval = NasEvaluacion {
        id: Uuid::new_v4(),
        usuario_id: autoria.usuario_id,
        paciente_rut: autoria.paciente_rut,
        fecha_evaluacion: autoria.fecha_evaluacion,
        checklist,
        resultado,
        observaciones: observaciones.filter(|o| !o.trim().is_empty()),
    };
    db::insert_nas(conn, &eval)?;

    tracing::info!(
        id = %eval.id,
        puntuacion = eval.resultado.puntuacion_total,
        carga = eval.resultado.carga.as_str(),
        "NAS evaluation stored"
    );
    Ok(eval)
}

pub fn obtener_nas(conn: &Connection, id: &Uuid) -> Result<NasEvaluacion, RegistroError> {
    db::get_nas(conn, id)?.ok_or_else(|| not_found("NasEvaluacion", id))
}

pub fn historial_nas(conn: &Connection, rut_raw: &str) -> Result<Vec<NasEvaluacion>, RegistroError> {
    let rut = require_paciente(conn, rut_raw)?;
    Ok(db::list_nas_by_paciente(conn, &rut)?)
}

// ═══════════════════════════════════════════════════════════
// Kinesiology
// ═══════════════════════════════════════════════════════════

pub fn registrar_kinesiologia(
    conn: &Connection,
    tables: &ScoringTables,
    envio: Envio,
    subpuntajes: KinesiologySubscores,
) -> Result<CategorizacionKinesiologia, RegistroError> {
    let autoria = resolver_envio(conn, envio)?;
    let resultado = compute_categorization(tables, &subpuntajes)?;

    let cat = CategorizacionKinesiologia {
        id: Uuid::new_v4(),
        usuario_id: autoria.usuario_id,
        paciente_rut: autoria.paciente_rut,
        fecha_evaluacion: autoria.fecha_evaluacion,
        subpuntajes,
        resultado,
    };
    db::insert_categorizacion(conn, &cat)?;

    tracing::info!(
        id = %cat.id,
        puntaje = cat.resultado.puntaje_total,
        complejidad = cat.resultado.complejidad.as_str(),
        "Kinesiology categorization stored"
    );
    Ok(cat)
}

pub fn obtener_kinesiologia(
    conn: &Connection,
    id: &Uuid,
) -> Result<CategorizacionKinesiologia, RegistroError> {
    db::get_categorizacion(conn, id)?.ok_or_else(|| not_found("CategorizacionKinesiologia", id))
}

pub fn historial_kinesiologia(
    conn: &Connection,
    rut_raw: &str,
) -> Result<Vec<CategorizacionKinesiologia>, RegistroError> {
    let rut = require_paciente(conn, rut_raw)?;
    Ok(db::list_categorizaciones_by_paciente(conn, &rut)?)
}

// ═══════════════════════════════════════════════════════════
// Burnout
// ═══════════════════════════════════════════════════════════

pub fn registrar_burnout(
    conn: &Connection,
    tables: &ScoringTables,
    usuario_id: Uuid,
    fecha_evaluacion: Option<NaiveDateTime>,
    respuestas: BurnoutResponseSet,
) -> Result<BurnoutEncuesta, RegistroError> {
    require_usuario(conn, &usuario_id)?;
    let resultado = compute_burnout(tables, &respuestas)?;

    let encuesta = BurnoutEncuesta {
        id: Uuid::new_v4(),
        usuario_id,
        fecha_evaluacion: fecha_evaluacion.map_or_else(now_timestamp, whole_seconds),
        respuestas,
        resultado,
    };
    db::insert_burnout(conn, &encuesta)?;

    // Subscale levels only; individual answers stay out of the log.
    tracing::info!(
        id = %encuesta.id,
        agotamiento = encuesta.resultado.agotamiento_emocional.nivel.as_str(),
        despersonalizacion = encuesta.resultado.despersonalizacion.nivel.as_str(),
        realizacion = encuesta.resultado.realizacion_personal.nivel.as_str(),
        "Burnout survey stored"
    );
    Ok(encuesta)
}

pub fn obtener_burnout(conn: &Connection, id: &Uuid) -> Result<BurnoutEncuesta, RegistroError> {
    db::get_burnout(conn, id)?.ok_or_else(|| not_found("BurnoutEncuesta", id))
}

pub fn historial_burnout(conn: &Connection, usuario_id: &Uuid) -> Result<Vec<BurnoutEncuesta>, RegistroError> {
    require_usuario(conn, usuario_id)?;
    Ok(db::list_burnout_by_usuario(conn, usuario_id)?)
}

fn not_found(entity_type: &str, id: &Uuid) -> RegistroError {
    RegistroError::Database(db::DatabaseError::NotFound {
        entity_type: entity_type.into(),
        id: id.to_string(),
    })
}
