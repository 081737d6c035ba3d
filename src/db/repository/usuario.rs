use std::str::FromStr;

use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::crypto::PasswordHash;
use crate::db::DatabaseError;
use crate::models::*;

/// Insert a user with an already computed hash. Hashing is the caller's job.
pub fn insert_usuario(
    conn: &Connection,
    usuario: &Usuario,
    password_hash: &PasswordHash,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO usuarios (id, nombre, email, estamento, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            usuario.id.to_string(),
            usuario.nombre,
            usuario.email,
            usuario.estamento.as_str(),
            password_hash.encode(),
            format_timestamp(&usuario.created_at),
        ],
    )
    .map_err(|e| DatabaseError::from_write(e, "usuario"))?;
    Ok(())
}

pub fn get_usuario(conn: &Connection, id: &Uuid) -> Result<Option<Usuario>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, nombre, email, estamento, created_at FROM usuarios WHERE id = ?1",
        params![id.to_string()],
        usuario_row,
    );

    match result {
        Ok(row) => Ok(Some(usuario_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_usuario_by_email(conn: &Connection, email: &str) -> Result<Option<Usuario>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, nombre, email, estamento, created_at FROM usuarios WHERE email = ?1",
        params![email],
        usuario_row,
    );

    match result {
        Ok(row) => Ok(Some(usuario_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_usuarios(conn: &Connection) -> Result<Vec<Usuario>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, nombre, email, estamento, created_at FROM usuarios ORDER BY nombre, email",
    )?;
    let rows = stmt.query_map([], usuario_row)?;

    let mut usuarios = Vec::new();
    for row in rows {
        usuarios.push(usuario_from_row(row?)?);
    }
    Ok(usuarios)
}

/// Stored password hash for a user, for credential verification.
pub fn get_password_hash(conn: &Connection, id: &Uuid) -> Result<PasswordHash, DatabaseError> {
    let encoded: String = conn
        .query_row(
            "SELECT password_hash FROM usuarios WHERE id = ?1",
            params![id.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "Usuario".into(),
                id: id.to_string(),
            },
            other => DatabaseError::from(other),
        })?;
    PasswordHash::decode(&encoded)
        .map_err(|e| DatabaseError::ConstraintViolation(format!("usuario {id}: {e}")))
}

pub fn usuario_exists(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM usuarios WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

// Internal row type for Usuario mapping
struct UsuarioRow {
    id: String,
    nombre: String,
    email: String,
    estamento: String,
    created_at: String,
}

fn usuario_row(row: &Row<'_>) -> rusqlite::Result<UsuarioRow> {
    Ok(UsuarioRow {
        id: row.get(0)?,
        nombre: row.get(1)?,
        email: row.get(2)?,
        estamento: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn usuario_from_row(row: UsuarioRow) -> Result<Usuario, DatabaseError> {
    Ok(Usuario {
        id: parse_uuid(&row.id)?,
        nombre: row.nombre,
        email: row.email,
        estamento: Estamento::from_str(&row.estamento)?,
        created_at: parse_timestamp(&row.created_at),
    })
}
