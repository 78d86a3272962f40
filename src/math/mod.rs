//! Mathematical utilities

pub mod morton;
pub mod ray;

pub use ray::Ray;
