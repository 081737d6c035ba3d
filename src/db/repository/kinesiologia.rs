use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::*;
use crate::scoring::{Complejidad, KinesiologyCategorization, KinesiologySubscores};

/// Subscores must be complete; a partially filled set never reaches storage.
pub fn insert_categorizacion(
    conn: &Connection,
    cat: &CategorizacionKinesiologia,
) -> Result<(), DatabaseError> {
    let s = &cat.subpuntajes;
    let values = [
        s.patron_respiratorio,
        s.asistencia_ventilatoria,
        s.sas_glasgow,
        s.tos_secreciones,
        s.asistencia,
    ];
    if values.iter().any(Option::is_none) {
        return Err(DatabaseError::ConstraintViolation(
            "categorizacion: incomplete subscores".into(),
        ));
    }

    conn.execute(
        "INSERT INTO categorizaciones_kinesiologia (id, usuario_id, paciente_rut, fecha_evaluacion,
         patron_respiratorio, asistencia_ventilatoria, sas_glasgow, tos_secreciones, asistencia,
         puntaje_total, complejidad, carga_asistencial)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            cat.id.to_string(),
            cat.usuario_id.to_string(),
            cat.paciente_rut,
            format_timestamp(&cat.fecha_evaluacion),
            s.patron_respiratorio,
            s.asistencia_ventilatoria,
            s.sas_glasgow,
            s.tos_secreciones,
            s.asistencia,
            cat.resultado.puntaje_total,
            cat.resultado.complejidad.as_str(),
            cat.resultado.carga_asistencial,
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "categorizacion"))?;
    Ok(())
}

const SELECT_CATEGORIZACION: &str = "SELECT id, usuario_id, paciente_rut, fecha_evaluacion,
     patron_respiratorio, asistencia_ventilatoria, sas_glasgow, tos_secreciones, asistencia,
     puntaje_total, complejidad, carga_asistencial
     FROM categorizaciones_kinesiologia";

pub fn get_categorizacion(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<CategorizacionKinesiologia>, DatabaseError> {
    let result = conn.query_row(
        &format!("{SELECT_CATEGORIZACION} WHERE id = ?1"),
        params![id.to_string()],
        categorizacion_row,
    );

    match result {
        Ok(row) => Ok(Some(categorizacion_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All kinesiology categorizations of a patient, newest first.
pub fn list_categorizaciones_by_paciente(
    conn: &Connection,
    paciente_rut: &str,
) -> Result<Vec<CategorizacionKinesiologia>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_CATEGORIZACION} WHERE paciente_rut = ?1 ORDER BY fecha_evaluacion DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map(params![paciente_rut], categorizacion_row)?;

    let mut cats = Vec::new();
    for row in rows {
        cats.push(categorizacion_from_row(row?)?);
    }
    Ok(cats)
}

struct CategorizacionRow {
    id: String,
    usuario_id: String,
    paciente_rut: Option<String>,
    fecha_evaluacion: String,
    subpuntajes: [i32; 5],
    puntaje_total: u8,
    complejidad: String,
    carga_asistencial: String,
}

fn categorizacion_row(row: &Row<'_>) -> rusqlite::Result<CategorizacionRow> {
    Ok(CategorizacionRow {
        id: row.get(0)?,
        usuario_id: row.get(1)?,
        paciente_rut: row.get(2)?,
        fecha_evaluacion: row.get(3)?,
        subpuntajes: [row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?, row.get(8)?],
        puntaje_total: row.get(9)?,
        complejidad: row.get(10)?,
        carga_asistencial: row.get(11)?,
    })
}

fn categorizacion_from_row(
    row: CategorizacionRow,
) -> Result<CategorizacionKinesiologia, DatabaseError> {
    let complejidad: Complejidad =
        row.complejidad.parse().map_err(|_| DatabaseError::InvalidEnum {
            field: "complejidad".into(),
            value: row.complejidad.clone(),
        })?;

    Ok(CategorizacionKinesiologia {
        id: parse_uuid(&row.id)?,
        usuario_id: parse_uuid(&row.usuario_id)?,
        paciente_rut: row.paciente_rut,
        fecha_evaluacion: parse_timestamp(&row.fecha_evaluacion),
        subpuntajes: KinesiologySubscores::new(row.subpuntajes),
        resultado: KinesiologyCategorization {
            puntaje_total: row.puntaje_total,
            complejidad,
            carga_asistencial: row.carga_asistencial,
        },
    })
}
