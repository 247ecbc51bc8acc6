//! Utilidades de validación
//!
//! Funciones para los atributos `custom` de `validator` y normalización de datos
//! de entrada.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    /// Matrícula: 3 letras + 4 caracteres (formato antiguo `ABC1234` y Mercosur `ABC1D23`),
    /// opcionalmente con guion
    static ref PLATE_RE: Regex = Regex::new(r"^[A-Z]{3}-?[0-9][A-Z0-9][0-9]{2}$").unwrap();
}

/// Recorta espacios y pasa a mayúsculas
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

pub fn validate_plate(value: &str) -> Result<(), ValidationError> {
    if PLATE_RE.is_match(&normalize_plate(value)) {
        Ok(())
    } else {
        let mut error = ValidationError::new("plate");
        error.add_param("value".into(), &value.to_string());
        Err(error)
    }
}

/// Validar que un importe no sea negativo
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_empty"));
    }
    Ok(())
}

/// Texto opcional: vacío o solo espacios equivale a ausente
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
