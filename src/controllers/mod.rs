//! Controladores: orquestan repositorios y servicios para cada grupo de rutas

pub mod driver_controller;
pub mod operation_controller;
pub mod record_controller;
pub mod store_controller;
pub mod vehicle_controller;
