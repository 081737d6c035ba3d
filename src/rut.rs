//! Chilean RUT (national identifier) normalisation.
//!
//! Patients are keyed by RUT. Input may carry dots, spaces and a lowercase
//! `k`; stored form is `<digits>-<check>` with no dots, e.g. `12345678-5`.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static RUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,8})-?([\dK])$").expect("RUT pattern is a valid regex")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RutError {
    #[error("RUT has an invalid format: {0}")]
    Formato(String),
    #[error("RUT check digit does not match: {0}")]
    DigitoVerificador(String),
}

/// Modulo-11 check digit for the numeric body of a RUT.
pub fn digito_verificador(cuerpo: u32) -> char {
    let mut suma = 0;
    let mut factor = 2;
    let mut n = cuerpo;
    while n > 0 {
        suma += (n % 10) * factor;
        n /= 10;
        factor = if factor == 7 { 2 } else { factor + 1 };
    }
    match 11 - (suma % 11) {
        11 => '0',
        10 => 'K',
        d => char::from_digit(d, 10).unwrap_or('0'),
    }
}

/// Validate and normalise a RUT to `<digits>-<check>`.
pub fn normalizar(input: &str) -> Result<String, RutError> {
    let limpio: String = input
        .chars()
        .filter(|c| !matches!(c, '.' | ' '))
        .collect::<String>()
        .to_uppercase();

    let caps = RUT_PATTERN
        .captures(&limpio)
        .ok_or_else(|| RutError::Formato(input.to_string()))?;

    let cuerpo: u32 = caps[1]
        .parse()
        .map_err(|_| RutError::Formato(input.to_string()))?;
    if cuerpo == 0 {
        return Err(RutError::Formato(input.to_string()));
    }
    let dv = caps[2].chars().next().unwrap_or(' ');

    if digito_verificador(cuerpo) != dv {
        return Err(RutError::DigitoVerificador(input.to_string()));
    }
    Ok(format!("{cuerpo}-{dv}"))
}
