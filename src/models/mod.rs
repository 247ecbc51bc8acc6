//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod auth;
pub mod dashboard;
pub mod driver;
pub mod store;
pub mod transport_record;
pub mod vehicle;
