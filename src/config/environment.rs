//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del servidor y los valores por
//! defecto del pre-solve cuando un request no los especifica. Los umbrales
//! de margen no son configurables: son constantes del modelo de costos.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::services::rate_solver::SolveOptions;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    // Defaults del pre-solve
    pub default_target_margin: Decimal,
    pub flag_high_rates: bool,
    pub high_rate_threshold: Decimal,
    pub min_rate: Decimal,
    pub max_rate: Option<Decimal>,
    /// Lanes del RFP demo sembrado al arrancar (0 = sin demo)
    pub demo_rfp_lanes: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        let solve = SolveOptions::default();
        Self {
            environment: "development".to_string(),
            port: 3000,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            default_target_margin: Decimal::from(12),
            flag_high_rates: solve.flag_high_rates,
            high_rate_threshold: solve.high_rate_threshold,
            min_rate: solve.min_rate,
            max_rate: solve.max_rate,
            demo_rfp_lanes: 0,
        }
    }
}

/// Leer y parsear una variable opcional
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a valid value, got '{}'", name, raw)),
        _ => Ok(None),
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde el entorno; las variables ausentes
    /// toman el valor por defecto y las malformadas son error
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins,
            default_target_margin: parse_var("DEFAULT_TARGET_MARGIN")?.unwrap_or(defaults.default_target_margin),
            flag_high_rates: parse_var("FLAG_HIGH_RATES")?.unwrap_or(defaults.flag_high_rates),
            high_rate_threshold: parse_var("HIGH_RATE_THRESHOLD")?.unwrap_or(defaults.high_rate_threshold),
            min_rate: parse_var("MIN_RATE")?.unwrap_or(defaults.min_rate),
            max_rate: parse_var("MAX_RATE")?.or(defaults.max_rate),
            demo_rfp_lanes: parse_var("DEMO_RFP_LANES")?.unwrap_or(defaults.demo_rfp_lanes),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Opciones de pre-solve por defecto
    pub fn solve_options(&self) -> SolveOptions {
        SolveOptions {
            flag_high_rates: self.flag_high_rates,
            high_rate_threshold: self.high_rate_threshold,
            min_rate: self.min_rate,
            max_rate: self.max_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_solve_options() {
        let config = EnvironmentConfig::default();
        let options = config.solve_options();

        assert!(options.flag_high_rates);
        assert_eq!(options.high_rate_threshold, dec!(20));
        assert_eq!(options.min_rate, Decimal::ZERO);
        assert_eq!(options.max_rate, None);
        assert_eq!(config.default_target_margin, dec!(12));
    }

    #[test]
    fn test_server_url() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert!(config.is_development());
    }
}
