//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos del workbench: lanes, RFPs y
//! escenarios de pricing.

pub mod lane;
pub mod rfp;
pub mod scenario;
