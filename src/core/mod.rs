//! Core types and utilities

pub mod types;
pub mod error;
pub mod logging;
pub mod input;
pub mod rng;
pub mod config;

pub use types::*;
pub use error::Error;
