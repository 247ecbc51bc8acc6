//! Utilidades del sistema
//!
//! Manejo de errores, validación y JWT.

pub mod errors;
pub mod jwt;
pub mod validation;
