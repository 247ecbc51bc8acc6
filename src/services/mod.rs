//! Services module
//!
//! Lógica de negocio: asistente de creación, envío, huella, firmas,
//! geolocalización, storage y lecturas de registros.

pub mod draft_store;
pub mod fingerprint;
pub mod geolocation;
pub mod operation_service;
pub mod record_service;
pub mod signature;
pub mod storage;
pub mod wizard;

pub use draft_store::DraftStore;
pub use storage::{storage_from_config, ObjectStorage};
