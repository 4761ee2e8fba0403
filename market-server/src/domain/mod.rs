pub mod error;
pub mod lead;
pub mod pagination;
pub mod user;
pub mod vehicle;
