//! Repository layer: entity-scoped database operations.
//!
//! Evaluation tables are insert-only; there are no update or delete
//! functions for them.

mod apache2;
mod burnout;
mod kinesiologia;
mod nas;
mod paciente;
mod usuario;

use chrono::{NaiveDateTime, Timelike};
use uuid::Uuid;

use super::DatabaseError;

pub use apache2::*;
pub use burnout::*;
pub use kinesiologia::*;
pub use nas::*;
pub use paciente::*;
pub use usuario::*;

pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .unwrap_or_default()
}

pub(crate) fn parse_uuid(raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

/// Drop sub-second precision; stored timestamps are whole seconds.
pub fn whole_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    ts.with_nanosecond(0).unwrap_or(ts)
}

/// Current local time truncated to whole seconds, matching stored precision.
pub fn now_timestamp() -> NaiveDateTime {
    whole_seconds(chrono::Local::now().naive_local())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use uuid::Uuid;

    use super::*;
    use crate::crypto::hash_password_with_iterations;
    use crate::models::*;

    pub fn usuario(conn: &Connection, email: &str) -> Usuario {
        let u = Usuario {
            id: Uuid::new_v4(),
            nombre: "Dra. Paz Soto".into(),
            email: email.into(),
            estamento: Estamento::Medicina,
            created_at: now_timestamp(),
        };
        let hash = hash_password_with_iterations("clave-segura-1", 1_000).unwrap();
        insert_usuario(conn, &u, &hash).unwrap();
        u
    }

    pub fn paciente(conn: &Connection, rut: &str, cama: Option<&str>) -> Paciente {
        let p = Paciente {
            rut: rut.into(),
            nombre: "Juan Pérez".into(),
            cama: cama.map(str::to_string),
            fecha_ingreso: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            diagnostico: Some("Neumonía grave".into()),
            created_at: now_timestamp(),
        };
        insert_paciente(conn, &p).unwrap();
        p
    }
}
