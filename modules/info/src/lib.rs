//! `Info` domain for clean-reactive.
//!
//! A pass-through service over a repository (in-memory or relational), a
//! key-value store used for a cache-aside read of one upstream URL, and
//! the REST routes that expose both.

pub mod contract;
pub use contract::{AiData, Info, NewInfo};

pub mod config;
pub use config::{InfoConfig, RootMode, StorageKind};

pub mod module;
pub use module::InfoModule;

pub mod humantime_serde;

pub mod api;
pub mod domain;
pub mod infra;
