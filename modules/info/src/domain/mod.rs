pub mod cache;
pub mod error;
pub mod repo;
pub mod service;
pub mod upstream;

#[cfg(test)]
mod service_test;
