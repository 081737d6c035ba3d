use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::*;
use crate::scoring::{CargaNas, NasChecklist, NasResult};

pub fn insert_nas(conn: &Connection, eval: &NasEvaluacion) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO nas_evaluaciones (id, usuario_id, paciente_rut, fecha_evaluacion,
         selecciones_json, items_json, puntuacion_total, carga, observaciones)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            eval.id.to_string(),
            eval.usuario_id.to_string(),
            eval.paciente_rut,
            format_timestamp(&eval.fecha_evaluacion),
            serde_json::to_string(&eval.checklist.selecciones)?,
            serde_json::to_string(&eval.resultado.items_seleccionados)?,
            eval.resultado.puntuacion_total,
            eval.resultado.carga.as_str(),
            eval.observaciones,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "nas"))?;
    Ok(())
}

const SELECT_NAS: &str = "SELECT id, usuario_id, paciente_rut, fecha_evaluacion,
     selecciones_json, items_json, puntuacion_total, carga, observaciones
     FROM nas_evaluaciones";

pub fn get_nas(conn: &Connection, id: &Uuid) -> Result<Option<NasEvaluacion>, DatabaseError> {
    let result = conn.query_row(
        &format!("{SELECT_NAS} WHERE id = ?1"),
        params![id.to_string()],
        nas_row,
    );

    match result {
        Ok(row) => Ok(Some(nas_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All NAS evaluations of a patient, newest first.
pub fn list_nas_by_paciente(
    conn: &Connection,
    paciente_rut: &str,
) -> Result<Vec<NasEvaluacion>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_NAS} WHERE paciente_rut = ?1 ORDER BY fecha_evaluacion DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map(params![paciente_rut], nas_row)?;

    let mut evals = Vec::new();
    for row in rows {
        evals.push(nas_from_row(row?)?);
    }
    Ok(evals)
}

struct NasRow {
    id: String,
    usuario_id: String,
    paciente_rut: Option<String>,
    fecha_evaluacion: String,
    selecciones_json: String,
    items_json: String,
    puntuacion_total: f64,
    carga: String,
    observaciones: Option<String>,
}

fn nas_row(row: &Row<'_>) -> rusqlite::Result<NasRow> {
    Ok(NasRow {
        id: row.get(0)?,
        usuario_id: row.get(1)?,
        paciente_rut: row.get(2)?,
        fecha_evaluacion: row.get(3)?,
        selecciones_json: row.get(4)?,
        items_json: row.get(5)?,
        puntuacion_total: row.get(6)?,
        carga: row.get(7)?,
        observaciones: row.get(8)?,
    })
}

fn nas_from_row(row: NasRow) -> Result<NasEvaluacion, DatabaseError> {
    let carga: CargaNas = row.carga.parse().map_err(|_| DatabaseError::InvalidEnum {
        field: "carga".into(),
        value: row.carga.clone(),
    })?;

    Ok(NasEvaluacion {
        id: parse_uuid(&row.id)?,
        usuario_id: parse_uuid(&row.usuario_id)?,
        paciente_rut: row.paciente_rut,
        fecha_evaluacion: parse_timestamp(&row.fecha_evaluacion),
        checklist: NasChecklist {
            selecciones: serde_json::from_str(&row.selecciones_json)?,
        },
        resultado: NasResult {
            puntuacion_total: row.puntuacion_total,
            carga,
            items_seleccionados: serde_json::from_str(&row.items_json)?,
        },
        observaciones: row.observaciones,
    })
}
