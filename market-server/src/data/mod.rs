pub mod lead_repository;
pub mod listing;
#[cfg(test)]
pub mod memory;
pub mod user_repository;
pub mod vehicle_repository;
