//! Utilidades de validación
//!
//! Validadores custom para `validator`: los requests de lanes llegan desde
//! formularios manuales o importación de archivos y el motor de pricing
//! asume números ya validados y acotados.

use num_traits::Zero;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

use crate::services::cost_model::{MAX_AMOUNT, MAX_DISTANCE, MAX_RATE_PER_MILE};

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + Zero + Serialize>(value: &T) -> Result<(), ValidationError> {
    if *value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + Zero + Serialize>(value: &T) -> Result<(), ValidationError> {
    if *value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

fn validate_bounded(value: &Decimal, max: Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > max {
        let mut error = ValidationError::new("out_of_range");
        error.add_param("value".into(), value);
        error.add_param("min".into(), &Decimal::ZERO);
        error.add_param("max".into(), &max);
        return Err(error);
    }
    Ok(())
}

/// Tarifa por milla en `[0, MAX_RATE_PER_MILE]`
pub fn validate_rate(value: &Decimal) -> Result<(), ValidationError> {
    validate_bounded(value, MAX_RATE_PER_MILE)
}

/// Distancia en `[0, MAX_DISTANCE]`
pub fn validate_distance(value: &Decimal) -> Result<(), ValidationError> {
    validate_bounded(value, MAX_DISTANCE)
}

/// Monto fijo en `[0, MAX_AMOUNT]`
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_bounded(value, MAX_AMOUNT)
}

/// Validar que un string no esté vacío (solo espacios cuenta como vacío)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
