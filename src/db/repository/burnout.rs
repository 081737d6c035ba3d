use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::*;
use crate::scoring::burnout::Subescala;
use crate::scoring::{BurnoutResponseSet, BurnoutResult, NivelBurnout};

pub fn insert_burnout(conn: &Connection, encuesta: &BurnoutEncuesta) -> Result<(), DatabaseError> {
    let r = &encuesta.resultado;
    conn.execute(
        "INSERT INTO burnout_encuestas (id, usuario_id, fecha_evaluacion, respuestas_json,
         agotamiento_puntaje, agotamiento_nivel, despersonalizacion_puntaje, despersonalizacion_nivel,
         realizacion_puntaje, realizacion_nivel)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            encuesta.id.to_string(),
            encuesta.usuario_id.to_string(),
            format_timestamp(&encuesta.fecha_evaluacion),
            serde_json::to_string(&encuesta.respuestas.respuestas)?,
            r.agotamiento_emocional.puntaje,
            r.agotamiento_emocional.nivel.as_str(),
            r.despersonalizacion.puntaje,
            r.despersonalizacion.nivel.as_str(),
            r.realizacion_personal.puntaje,
            r.realizacion_personal.nivel.as_str(),
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "burnout"))?;
    Ok(())
}

const SELECT_BURNOUT: &str = "SELECT id, usuario_id, fecha_evaluacion, respuestas_json,
     agotamiento_puntaje, agotamiento_nivel, despersonalizacion_puntaje, despersonalizacion_nivel,
     realizacion_puntaje, realizacion_nivel
     FROM burnout_encuestas";

pub fn get_burnout(conn: &Connection, id: &Uuid) -> Result<Option<BurnoutEncuesta>, DatabaseError> {
    let result = conn.query_row(
        &format!("{SELECT_BURNOUT} WHERE id = ?1"),
        params![id.to_string()],
        burnout_row,
    );

    match result {
        Ok(row) => Ok(Some(burnout_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Surveys answered by one staff member, newest first.
pub fn list_burnout_by_usuario(
    conn: &Connection,
    usuario_id: &Uuid,
) -> Result<Vec<BurnoutEncuesta>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_BURNOUT} WHERE usuario_id = ?1 ORDER BY fecha_evaluacion DESC, rowid DESC"
    ))?;
    let rows = stmt.query_map(params![usuario_id.to_string()], burnout_row)?;

    let mut encuestas = Vec::new();
    for row in rows {
        encuestas.push(burnout_from_row(row?)?);
    }
    Ok(encuestas)
}

struct BurnoutRow {
    id: String,
    usuario_id: String,
    fecha_evaluacion: String,
    respuestas_json: String,
    subescalas: [(u32, String); 3],
}

fn burnout_row(row: &Row<'_>) -> rusqlite::Result<BurnoutRow> {
    Ok(BurnoutRow {
        id: row.get(0)?,
        usuario_id: row.get(1)?,
        fecha_evaluacion: row.get(2)?,
        respuestas_json: row.get(3)?,
        subescalas: [
            (row.get(4)?, row.get(5)?),
            (row.get(6)?, row.get(7)?),
            (row.get(8)?, row.get(9)?),
        ],
    })
}

fn subescala((puntaje, nivel): (u32, String)) -> Result<Subescala, DatabaseError> {
    let nivel: NivelBurnout = nivel.parse().map_err(|_| DatabaseError::InvalidEnum {
        field: "nivel_burnout".into(),
        value: nivel.clone(),
    })?;
    Ok(Subescala { puntaje, nivel })
}

fn burnout_from_row(row: BurnoutRow) -> Result<BurnoutEncuesta, DatabaseError> {
    let [ae, dp, rp] = row.subescalas;
    Ok(BurnoutEncuesta {
        id: parse_uuid(&row.id)?,
        usuario_id: parse_uuid(&row.usuario_id)?,
        fecha_evaluacion: parse_timestamp(&row.fecha_evaluacion),
        respuestas: BurnoutResponseSet {
            respuestas: serde_json::from_str(&row.respuestas_json)?,
        },
        resultado: BurnoutResult {
            agotamiento_emocional: subescala(ae)?,
            despersonalizacion: subescala(dp)?,
            realizacion_personal: subescala(rp)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{fixtures, now_timestamp};
    use crate::db::sqlite::open_memory_database;
    use crate::scoring::burnout::NUM_PREGUNTAS;
    use crate::scoring::{compute_burnout, ScoringTables};

    fn encuesta(usuario_id: Uuid, valor: i32) -> BurnoutEncuesta {
        let respuestas = BurnoutResponseSet {
            respuestas: vec![valor; NUM_PREGUNTAS],
        };
        let resultado = compute_burnout(&ScoringTables::standard().unwrap(), &respuestas).unwrap();
        BurnoutEncuesta {
            id: Uuid::new_v4(),
            usuario_id,
            fecha_evaluacion: now_timestamp(),
            respuestas,
            resultado,
        }
    }

    #[test]
    fn burnout_insert_and_retrieve() {
        let conn = open_memory_database().unwrap();
        let u = fixtures::usuario(&conn, "tens@uti.cl");
        let e = encuesta(u.id, 3);
        insert_burnout(&conn, &e).unwrap();
        let stored = get_burnout(&conn, &e.id).unwrap().unwrap();
        assert_eq!(stored, e);
        assert_eq!(stored.resultado.agotamiento_emocional.nivel, NivelBurnout::Alto);
    }

    #[test]
    fn list_by_usuario_only_returns_own_surveys() {
        let conn = open_memory_database().unwrap();
        let a = fixtures::usuario(&conn, "a@uti.cl");
        let b = fixtures::usuario(&conn, "b@uti.cl");
        let first = encuesta(a.id, 1);
        let second = encuesta(a.id, 2);
        insert_burnout(&conn, &first).unwrap();
        insert_burnout(&conn, &second).unwrap();
        insert_burnout(&conn, &encuesta(b.id, 5)).unwrap();

        let list = list_burnout_by_usuario(&conn, &a.id).unwrap();
        assert_eq!(list.iter().map(|e| e.id).collect::<Vec<_>>(), vec![second.id, first.id]);
    }

    #[test]
    fn unknown_usuario_violates_foreign_key() {
        let conn = open_memory_database().unwrap();
        let err = insert_burnout(&conn, &encuesta(Uuid::new_v4(), 0)).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }
}
