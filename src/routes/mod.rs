//! Routers de la API

pub mod driver_routes;
pub mod operation_routes;
pub mod record_routes;
pub mod store_routes;
pub mod vehicle_routes;
