use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

use super::{format_timestamp, parse_timestamp};
use crate::db::DatabaseError;
use crate::models::*;

pub fn insert_paciente(conn: &Connection, paciente: &Paciente) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO pacientes (rut, nombre, cama, fecha_ingreso, diagnostico, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            paciente.rut,
            paciente.nombre,
            paciente.cama,
            paciente.fecha_ingreso.to_string(),
            paciente.diagnostico,
            format_timestamp(&paciente.created_at),
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "paciente"))?;
    Ok(())
}

pub fn get_paciente(conn: &Connection, rut: &str) -> Result<Option<Paciente>, DatabaseError> {
    let result = conn.query_row(
        "SELECT rut, nombre, cama, fecha_ingreso, diagnostico, created_at
         FROM pacientes WHERE rut = ?1",
        params![rut],
        paciente_from_row,
    );

    match result {
        Ok(p) => Ok(Some(p)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_pacientes(conn: &Connection) -> Result<Vec<Paciente>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT rut, nombre, cama, fecha_ingreso, diagnostico, created_at
         FROM pacientes ORDER BY cama IS NULL, cama, nombre",
    )?;
    let rows = stmt.query_map([], paciente_from_row)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DatabaseError::from)
}

/// Assign (or clear, with `None`) the bed of a patient. A bed held by
/// another patient is a constraint violation.
pub fn update_cama(conn: &Connection, rut: &str, cama: Option<&str>) -> Result<(), DatabaseError> {
    let rows = conn
        .execute(
            "UPDATE pacientes SET cama = ?2 WHERE rut = ?1",
            params![rut, cama],
        )
        .map_err(|e| DatabaseError::from_write(e, "cama"))?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Paciente".into(),
            id: rut.to_string(),
        });
    }
    Ok(())
}

pub fn paciente_exists(conn: &Connection, rut: &str) -> Result<bool, DatabaseError> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pacientes WHERE rut = ?1",
        params![rut],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

fn paciente_from_row(row: &Row<'_>) -> rusqlite::Result<Paciente> {
    Ok(Paciente {
        rut: row.get(0)?,
        nombre: row.get(1)?,
        cama: row.get(2)?,
        fecha_ingreso: NaiveDate::parse_from_str(&row.get::<_, String>(3)?, "%Y-%m-%d")
            .unwrap_or_default(),
        diagnostico: row.get(4)?,
        created_at: parse_timestamp(&row.get::<_, String>(5)?),
    })
}
