//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de entorno del servidor.

pub mod environment;

pub use environment::*;
