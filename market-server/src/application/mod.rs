pub mod auth_service;
pub mod lead_service;
pub mod vehicle_service;
