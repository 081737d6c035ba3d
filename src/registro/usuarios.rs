use std::sync::LazyLock;

use regex::Regex;
use rusqlite::Connection;
use uuid::Uuid;
use zeroize::Zeroize;

use super::{required_text, RegistroError};
use crate::crypto::{hash_password_with_iterations, verify_password};
use crate::db::{self, now_timestamp};
use crate::models::{NuevoUsuario, Usuario};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Register a staff member. The password is hashed here, before the
/// repository sees it, and the plaintext is wiped afterwards.
pub fn registrar_usuario(
    conn: &Connection,
    mut nuevo: NuevoUsuario,
    iterations: u32,
) -> Result<Usuario, RegistroError> {
    let nombre = required_text("nombre", &nuevo.nombre)?;
    let email = nuevo.email.trim().to_lowercase();
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(RegistroError::validation("email", "is not a valid address"));
    }

    let hash = hash_password_with_iterations(&nuevo.password, iterations);
    nuevo.password.zeroize();
    let hash = hash?;

    let usuario = Usuario {
        id: Uuid::new_v4(),
        nombre,
        email,
        estamento: nuevo.estamento,
        created_at: now_timestamp(),
    };
    db::insert_usuario(conn, &usuario, &hash)?;

    tracing::info!(
        usuario_id = %usuario.id,
        estamento = usuario.estamento.as_str(),
        "Usuario registered"
    );
    Ok(usuario)
}

pub fn obtener_usuario(conn: &Connection, id: &Uuid) -> Result<Usuario, RegistroError> {
    db::get_usuario(conn, id)?.ok_or(RegistroError::UsuarioNoEncontrado(*id))
}

/// Check an email/password pair. Unknown email and wrong password are
/// indistinguishable to the caller.
pub fn verificar_credenciales(
    conn: &Connection,
    email: &str,
    password: &str,
) -> Result<Option<Usuario>, RegistroError> {
    let Some(usuario) = db::get_usuario_by_email(conn, &email.trim().to_lowercase())? else {
        return Ok(None);
    };
    let stored = db::get_password_hash(conn, &usuario.id)?;
    Ok(verify_password(password, &stored).then_some(usuario))
}
