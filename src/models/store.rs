//! Modelo de Store
//!
//! Tiendas (puntos de recogida/entrega) de una empresa. Mapea a la tabla `stores`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Store {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub default_price: Option<Decimal>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
