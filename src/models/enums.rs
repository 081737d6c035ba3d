use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

pub use crate::scoring::TipoIngreso;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Staff group of a unit member.
str_enum!(Estamento {
    Medicina => "medicina",
    Enfermeria => "enfermeria",
    Kinesiologia => "kinesiologia",
    Tens => "tens",
    Auxiliares => "auxiliares",
    Administrador => "administrador",
});
