//! Modelo de TransportRecord
//!
//! Un registro es una recogida o entrega que vincula tienda, conductor, valor,
//! posición y firmas. Se crea una sola vez y no se modifica después.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de operación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    #[default]
    Pickup,
    Delivery,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Pickup => "pickup",
            OperationKind::Delivery => "delivery",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pickup" => Some(OperationKind::Pickup),
            "delivery" => Some(OperationKind::Delivery),
            _ => None,
        }
    }
}

/// Estado del registro. Se fija al crear y no transiciona.
/// `Pending` es el valor por defecto de la columna; el envío siempre fija `Finalized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Pending,
    Finalized,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Finalized => "finalized",
        }
    }
}

/// Par latitud/longitud capturado una vez por registro
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Decimales de los importes persistidos (`NUMERIC(_, 2)`)
pub const MONEY_SCALE: u32 = 2;

/// Mayor precio unitario que cabe en `NUMERIC(12, 2)`
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Mayor total que cabe en `NUMERIC(14, 2)`
pub const MAX_TOTAL_VALUE: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Precio con a lo sumo dos decimales significativos y dentro del rango de la columna
pub fn is_storable_price(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE && value.abs() <= MAX_UNIT_PRICE
}

/// Valores derivados de cantidad y precio unitario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub total_value: Decimal,
    pub final_value: Decimal,
}

impl Totals {
    /// total = cantidad × precio unitario; el valor final es igual al total.
    /// `None` si el producto desborda o no cabe en la columna del total.
    pub fn compute(quantity: i32, unit_price: Decimal) -> Option<Self> {
        let total_value = Decimal::from(quantity).checked_mul(unit_price)?;
        if total_value.abs() > MAX_TOTAL_VALUE {
            return None;
        }
        Some(Self {
            total_value,
            final_value: total_value,
        })
    }
}

/// Formato monetario con dos decimales ("150.00")
pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Fila de `transport_records`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransportRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub store_id: Uuid,
    pub driver_id: Uuid,
    pub sequence_number: i64,
    pub kind: String,
    pub volume_type: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub final_value: Decimal,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub driver_signature_path: Option<String>,
    pub responsible_signature_path: Option<String>,
    pub cargo_photo_path: Option<String>,
    pub fingerprint: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Registro listo para insertar. El número secuencial lo asigna la base de datos.
#[derive(Debug, Clone)]
pub struct NewTransportRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub store_id: Uuid,
    pub driver_id: Uuid,
    pub kind: OperationKind,
    pub volume_type: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub totals: Totals,
    pub location: Option<Coordinates>,
    pub driver_signature_path: Option<String>,
    pub responsible_signature_path: Option<String>,
    pub cargo_photo_path: Option<String>,
    pub fingerprint: String,
    pub status: RecordStatus,
    pub notes: Option<String>,
}

/// Registro con los nombres de tienda y conductor ya resueltos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecordDetail {
    pub id: Uuid,
    pub company_id: Uuid,
    pub sequence_number: i64,
    pub kind: String,
    pub volume_type: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_value: Decimal,
    pub final_value: Decimal,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub fingerprint: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub store_id: Uuid,
    pub store_name: Option<String>,
    pub store_address: Option<String>,
    pub driver_id: Uuid,
    pub driver_name: Option<String>,
}

impl RecordDetail {
    /// Filtro de texto libre del historial: tienda, conductor o número secuencial
    pub fn matches_search(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let contains = |value: &Option<String>| {
            value
                .as_deref()
                .map(|v| v.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };
        contains(&self.store_name)
            || contains(&self.driver_name)
            || self.sequence_number.to_string().contains(&needle)
    }
}
