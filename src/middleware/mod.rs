//! Middleware del sistema
//!
//! CORS y trazado de requests HTTP.

pub mod cors;

pub use cors::*;
