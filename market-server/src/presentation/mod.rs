pub mod coerce;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod rate_limit;
pub mod utils;
