use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::enums::Estamento;

/// A unit staff member. The password hash is stored alongside but never
/// carried on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub estamento: Estamento,
    pub created_at: NaiveDateTime,
}

/// Registration request. The plaintext password is wiped once hashed.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct NuevoUsuario {
    #[zeroize(skip)]
    pub nombre: String,
    #[zeroize(skip)]
    pub email: String,
    #[zeroize(skip)]
    pub estamento: Estamento,
    pub password: String,
}

impl std::fmt::Debug for NuevoUsuario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NuevoUsuario")
            .field("nombre", &self.nombre)
            .field("email", &self.email)
            .field("estamento", &self.estamento)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
