//! Huella de contenido de los registros de transporte
//!
//! SHA-256 en hexadecimal sobre `store|driver|total|timestamp|latitude`.
//! El timestamp usado aquí no se persiste por separado de `created_at`, así que
//! la huella sirve para comparación visual y no es recalculable por terceros.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use uuid::Uuid;

const DELIMITER: char = '|';

#[derive(Debug, Clone, Copy)]
pub struct FingerprintInput {
    pub store_id: Uuid,
    pub driver_id: Uuid,
    pub total_value: Decimal,
    pub timestamp: DateTime<Utc>,
    pub latitude: Option<f64>,
}

impl FingerprintInput {
    /// Cadena canónica que se hashea
    pub fn canonical(&self) -> String {
        let latitude = self.latitude.map(|l| l.to_string()).unwrap_or_default();
        format!(
            "{}{d}{}{d}{}{d}{}{d}{}",
            self.store_id,
            self.driver_id,
            self.total_value.normalize(),
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            latitude,
            d = DELIMITER,
        )
    }
}

pub fn derive_fingerprint(input: &FingerprintInput) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.canonical().as_bytes());
    hex::encode(hasher.finalize())
}
