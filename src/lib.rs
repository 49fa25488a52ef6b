//! Motor de pricing para RFPs de transporte
//!
//! Modelo de costos por lane, clasificación de margen, solver de tarifa
//! objetivo y detección de tarifas anómalas, expuestos vía una API axum.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
