use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::*;
use crate::scoring::{Apache2Result, NivelRiesgo};

pub fn insert_apache2(conn: &Connection, eval: &Apache2Evaluacion) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO apache2_evaluaciones (id, usuario_id, paciente_rut, fecha_evaluacion,
         mediciones_json, contribuciones_json, puntaje_total, nivel_riesgo, mortalidad_estimada)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            eval.id.to_string(),
            eval.usuario_id.to_string(),
            eval.paciente_rut,
            format_timestamp(&eval.fecha_evaluacion),
            serde_json::to_string(&eval.mediciones)?,
            serde_json::to_string(&eval.resultado.contribuciones)?,
            eval.resultado.puntaje_total,
            eval.resultado.nivel_riesgo.as_str(),
            eval.resultado.mortalidad_estimada,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "apache2"))?;
    Ok(())
}

const SELECT_APACHE2: &str = "SELECT id, usuario_id, paciente_rut, fecha_evaluacion, mediciones_json,
     contribuciones_json, puntaje_total, nivel_riesgo, mortalidad_estimada
     FROM apache2_evaluaciones";

pub fn get_apache2(conn: &Connection, id: &Uuid) -> Result<Option<Apache2Evaluacion>, DatabaseError> {
    let result = conn.query_row(
        &format!("{SELECT_APACHE2} WHERE id = ?1"),
        params![id.to_string()],
        apache2_row,
    );

    match result {
        Ok(row) => Ok(Some(apache2_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All APACHE II evaluations of a patient, newest first.
pub fn list_apache2_by_paciente(
    conn: &Connection,
    paciente_rut: &str,
) -> Result<Vec<Apache2Evaluacion>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_APACHE2} WHERE paciente_rut = ?1 ORDER BY fecha_evaluacion DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map(params![paciente_rut], apache2_row)?;

    let mut evals = Vec::new();
    for row in rows {
        evals.push(apache2_from_row(row?)?);
    }
    Ok(evals)
}

// Internal row type for Apache2Evaluacion mapping
struct Apache2Row {
    id: String,
    usuario_id: String,
    paciente_rut: Option<String>,
    fecha_evaluacion: String,
    mediciones_json: String,
    contribuciones_json: String,
    puntaje_total: u32,
    nivel_riesgo: String,
    mortalidad_estimada: Option<String>,
}

fn apache2_row(row: &Row<'_>) -> rusqlite::Result<Apache2Row> {
    Ok(Apache2Row {
        id: row.get(0)?,
        usuario_id: row.get(1)?,
        paciente_rut: row.get(2)?,
        fecha_evaluacion: row.get(3)?,
        mediciones_json: row.get(4)?,
        contribuciones_json: row.get(5)?,
        puntaje_total: row.get(6)?,
        nivel_riesgo: row.get(7)?,
        mortalidad_estimada: row.get(8)?,
    })
}

fn apache2_from_row(row: Apache2Row) -> Result<Apache2Evaluacion, DatabaseError> {
    let nivel_riesgo: NivelRiesgo =
        row.nivel_riesgo.parse().map_err(|_| DatabaseError::InvalidEnum {
            field: "nivel_riesgo".into(),
            value: row.nivel_riesgo.clone(),
        })?;

    Ok(Apache2Evaluacion {
        id: parse_uuid(&row.id)?,
        usuario_id: parse_uuid(&row.usuario_id)?,
        paciente_rut: row.paciente_rut,
        fecha_evaluacion: parse_timestamp(&row.fecha_evaluacion),
        mediciones: serde_json::from_str(&row.mediciones_json)?,
        resultado: Apache2Result {
            contribuciones: serde_json::from_str(&row.contribuciones_json)?,
            puntaje_total: row.puntaje_total,
            nivel_riesgo,
            mortalidad_estimada: row.mortalidad_estimada,
        },
    })
}
