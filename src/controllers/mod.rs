//! Controllers
//!
//! Orquestan los servicios de pricing para cada endpoint HTTP.

pub mod pricing_controller;
pub mod rfp_controller;
