//! Modelo de Vehicle
//!
//! Mapea exactamente a la tabla `vehicles`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub company_id: Uuid,
    pub plate: String,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
