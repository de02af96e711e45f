pub mod dto;
mod error;
mod handlers;
pub mod problem;
pub mod routes;

pub use error::domain_error_to_problem;
