//! Detector de tarifas demasiado altas
//!
//! Compara la tarifa de un lane contra el benchmark de mercado y, si no
//! dispara, contra la tarifa histórica. Solo se reporta una razón y el
//! benchmark tiene prioridad.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::lane::Lane;
use crate::services::cost_model::round_fixed;

/// Porcentaje por encima de la referencia a partir del cual se marca (20%)
pub const DEFAULT_HIGH_RATE_THRESHOLD: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Referencia contra la que se comparó la tarifa
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Benchmark,
    Historical,
}

impl ReferenceKind {
    fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Benchmark => "market benchmark",
            ReferenceKind::Historical => "historical rate",
        }
    }
}

/// Veredicto del chequeo de tarifa alta
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateCheck {
    pub is_too_high: bool,
    pub reason: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub percent_above: Decimal,
    pub compared_to: Option<ReferenceKind>,
}

impl RateCheck {
    fn clear() -> Self {
        Self {
            is_too_high: false,
            reason: None,
            percent_above: Decimal::ZERO,
            compared_to: None,
        }
    }

    fn flagged(kind: ReferenceKind, percent_above: Decimal) -> Self {
        Self {
            is_too_high: true,
            reason: Some(format!(
                "Rate is {}% above {}",
                round_fixed(percent_above, 1),
                kind.label()
            )),
            percent_above,
            compared_to: Some(kind),
        }
    }
}

/// Porcentaje de `rate` por encima de `reference`; `None` si la referencia
/// no es positiva. Satura en `Decimal::MAX` frente a referencias ínfimas.
pub fn percent_above(rate: Decimal, reference: Decimal) -> Option<Decimal> {
    if reference <= Decimal::ZERO {
        return None;
    }
    let above = rate
        .checked_sub(reference)
        .and_then(|diff| diff.checked_div(reference))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
    Some(above.unwrap_or(Decimal::MAX))
}

/// Chequear si una tarifa supera sus referencias por más de `threshold` %
pub fn check_rate_too_high(
    base_rate: Decimal,
    benchmark: Option<Decimal>,
    historical_rate: Option<Decimal>,
    threshold: Decimal,
) -> RateCheck {
    let references = [
        (ReferenceKind::Benchmark, benchmark),
        (ReferenceKind::Historical, historical_rate),
    ];

    for (kind, reference) in references {
        let Some(above) = reference.and_then(|r| percent_above(base_rate, r)) else {
            continue;
        };
        if above > threshold {
            log::debug!("🚩 Tarifa {} marcada: {}% sobre {:?}", base_rate, above, kind);
            return RateCheck::flagged(kind, above);
        }
    }

    RateCheck::clear()
}

/// Chequear la tarifa actual de un lane (umbral por defecto 20%)
pub fn check_lane(lane: &Lane, threshold: Option<Decimal>) -> RateCheck {
    check_rate_too_high(
        lane.base_rate(),
        lane.benchmark(),
        lane.historical_rate(),
        threshold.unwrap_or(DEFAULT_HIGH_RATE_THRESHOLD),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_benchmark_takes_precedence() {
        // Ambas referencias dispararían a 20%
        let check = check_rate_too_high(dec!(3.00), Some(dec!(2.00)), Some(dec!(2.20)), dec!(20));

        assert!(check.is_too_high);
        assert_eq!(check.compared_to, Some(ReferenceKind::Benchmark));
        assert_eq!(check.percent_above, dec!(50));
        assert_eq!(check.reason.as_deref(), Some("Rate is 50.0% above market benchmark"));
    }

    #[test]
    fn test_falls_back_to_historical() {
        // El benchmark no dispara, el histórico sí
        let check = check_rate_too_high(dec!(3.00), Some(dec!(2.80)), Some(dec!(2.40)), dec!(20));

        assert!(check.is_too_high);
        assert_eq!(check.compared_to, Some(ReferenceKind::Historical));
        assert_eq!(check.reason.as_deref(), Some("Rate is 25.0% above historical rate"));
    }

    #[test]
    fn test_threshold_is_strict() {
        // Exactamente 20% por encima no se marca
        let check = check_rate_too_high(dec!(2.40), Some(dec!(2.00)), None, dec!(20));
        assert!(!check.is_too_high);
        assert_eq!(check, RateCheck::clear());
    }

    #[test]
    fn test_missing_or_zero_references_skip() {
        assert_eq!(check_rate_too_high(dec!(9.99), None, None, dec!(20)), RateCheck::clear());
        assert_eq!(
            check_rate_too_high(dec!(9.99), Some(Decimal::ZERO), Some(Decimal::ZERO), dec!(20)),
            RateCheck::clear()
        );
    }

    #[test]
    fn test_reason_rounds_to_one_decimal() {
        // (2.50 - 1.90) / 1.90 = 31.578...%
        let check = check_rate_too_high(dec!(2.50), Some(dec!(1.90)), None, dec!(20));
        assert_eq!(check.reason.as_deref(), Some("Rate is 31.6% above market benchmark"));
        assert!(check.percent_above > dec!(31.57) && check.percent_above < dec!(31.58));
    }

    #[test]
    fn test_percent_above_rejects_non_positive_reference() {
        assert_eq!(percent_above(dec!(2), Decimal::ZERO), None);
        assert_eq!(percent_above(dec!(2), dec!(-1)), None);
        assert_eq!(percent_above(dec!(1), dec!(2)), Some(dec!(-50)));
        // 1e6 sobre 1e-28 no entra en Decimal
        assert_eq!(percent_above(dec!(1000000), Decimal::new(1, 28)), Some(Decimal::MAX));
    }
}
