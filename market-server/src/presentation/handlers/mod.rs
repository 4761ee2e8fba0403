pub mod auth;
pub mod lead;
pub mod vehicle;
