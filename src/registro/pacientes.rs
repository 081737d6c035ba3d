use rusqlite::Connection;

use super::{required_text, RegistroError};
use crate::db::{self, now_timestamp};
use crate::models::{NuevoPaciente, Paciente};
use crate::rut;

fn normalizar_cama(cama: Option<&str>) -> Option<String> {
    cama.map(str::trim).filter(|c| !c.is_empty()).map(str::to_uppercase)
}

pub fn registrar_paciente(conn: &Connection, nuevo: NuevoPaciente) -> Result<Paciente, RegistroError> {
    let paciente = Paciente {
        rut: rut::normalizar(&nuevo.rut)?,
        nombre: required_text("nombre", &nuevo.nombre)?,
        cama: normalizar_cama(nuevo.cama.as_deref()),
        fecha_ingreso: nuevo.fecha_ingreso,
        diagnostico: nuevo
            .diagnostico
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        created_at: now_timestamp(),
    };
    db::insert_paciente(conn, &paciente)?;
    tracing::info!(rut = %paciente.rut, cama = ?paciente.cama, "Paciente admitted");
    Ok(paciente)
}

/// Look a patient up by any accepted RUT spelling.
pub fn obtener_paciente(conn: &Connection, rut_raw: &str) -> Result<Paciente, RegistroError> {
    let rut = rut::normalizar(rut_raw)?;
    db::get_paciente(conn, &rut)?.ok_or(RegistroError::PacienteNoEncontrado(rut))
}

/// Move a patient to a bed, or release the bed with `None`.
pub fn asignar_cama(
    conn: &Connection,
    rut_raw: &str,
    cama: Option<&str>,
) -> Result<Paciente, RegistroError> {
    let rut = rut::normalizar(rut_raw)?;
    if !db::paciente_exists(conn, &rut)? {
        return Err(RegistroError::PacienteNoEncontrado(rut));
    }
    let cama = normalizar_cama(cama);
    db::update_cama(conn, &rut, cama.as_deref())?;
    tracing::info!(rut = %rut, cama = ?cama, "Bed assignment updated");
    obtener_paciente(conn, &rut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{open_memory_database, DatabaseError};
    use crate::rut::RutError;
    use chrono::NaiveDate;

    fn nuevo(rut: &str, cama: Option<&str>) -> NuevoPaciente {
        NuevoPaciente {
            rut: rut.into(),
            nombre: " María González ".into(),
            cama: cama.map(str::to_string),
            fecha_ingreso: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            diagnostico: Some("  ".into()),
        }
    }

    #[test]
    fn admission_normalises_rut_bed_and_text() {
        let conn = open_memory_database().unwrap();
        let p = registrar_paciente(&conn, nuevo("12.345.678-5", Some(" uti-3 "))).unwrap();
        assert_eq!(p.rut, "12345678-5");
        assert_eq!(p.nombre, "María González");
        assert_eq!(p.cama.as_deref(), Some("UTI-3"));
        assert!(p.diagnostico.is_none());
    }

    #[test]
    fn invalid_rut_is_rejected() {
        let conn = open_memory_database().unwrap();
        let err = registrar_paciente(&conn, nuevo("12.345.678-0", None)).unwrap_err();
        assert!(matches!(err, RegistroError::Rut(RutError::DigitoVerificador(_))));
    }

    #[test]
    fn lookup_accepts_any_spelling() {
        let conn = open_memory_database().unwrap();
        registrar_paciente(&conn, nuevo("12345678-5", None)).unwrap();
        assert_eq!(obtener_paciente(&conn, "12.345.678-5").unwrap().rut, "12345678-5");
        assert!(matches!(
            obtener_paciente(&conn, "11.111.111-1"),
            Err(RegistroError::PacienteNoEncontrado(_))
        ));
    }

    #[test]
    fn occupied_bed_is_conflict() {
        let conn = open_memory_database().unwrap();
        registrar_paciente(&conn, nuevo("12345678-5", Some("UTI-1"))).unwrap();
        registrar_paciente(&conn, nuevo("11111111-1", None)).unwrap();
        let err = asignar_cama(&conn, "11111111-1", Some("uti-1")).unwrap_err();
        assert!(matches!(
            err,
            RegistroError::Database(DatabaseError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn bed_can_be_released_and_reassigned() {
        let conn = open_memory_database().unwrap();
        registrar_paciente(&conn, nuevo("12345678-5", Some("UTI-1"))).unwrap();
        registrar_paciente(&conn, nuevo("11111111-1", None)).unwrap();
        let liberado = asignar_cama(&conn, "12345678-5", None).unwrap();
        assert!(liberado.cama.is_none());
        let p = asignar_cama(&conn, "11111111-1", Some("UTI-1")).unwrap();
        assert_eq!(p.cama.as_deref(), Some("UTI-1"));
    }
}
