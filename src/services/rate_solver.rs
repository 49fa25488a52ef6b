//! Solver de tarifas por margen objetivo
//!
//! Invierte el modelo de costos en forma cerrada. Con `R = revenue`,
//! `C = otros costos` y `k = LINEHAUL_COST_RATIO`, el costo total es
//! `kR + C` y el margen objetivo `M` cumple
//!
//! ```text
//! M = (R - (kR + C)) / (kR + C) * 100
//! R = C * (100 + M) / (100 * (1 - k) - k * M)
//! ```
//!
//! Con `k = 0.75` el denominador es `25 - 0.75 * M`, así que ningún margen
//! igual o superior a 33.33% es alcanzable. Cerca de ese techo el cociente
//! crece sin límite: cualquier resultado que no entre en `Decimal` o que
//! supere `MAX_RATE_PER_MILE` se trata igual que un margen inalcanzable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::lane::Lane;
use crate::services::anomaly_detector::{self, DEFAULT_HIGH_RATE_THRESHOLD};
use crate::services::cost_model::{self, CostInputs, LINEHAUL_COST_RATIO, MAX_RATE_PER_MILE};

/// Opciones del pre-solve en lote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    pub flag_high_rates: bool,
    pub high_rate_threshold: Decimal,
    pub min_rate: Decimal,
    pub max_rate: Option<Decimal>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            flag_high_rates: true,
            high_rate_threshold: DEFAULT_HIGH_RATE_THRESHOLD,
            min_rate: Decimal::ZERO,
            max_rate: None,
        }
    }
}

/// Solución de un lane, lista para aplicarse sobre el registro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub lane_id: String,
    pub original_rate: Decimal,
    /// Tarifa óptima tras aplicar min/max, sin redondear
    pub optimal_rate: Decimal,
    /// Tarifa a aplicar (2 decimales)
    pub new_rate: Decimal,
    /// Margen que realmente produce `new_rate` (1 decimal)
    pub new_margin: Decimal,
    pub target_margin: Decimal,
    pub rate_too_high: bool,
    pub rate_warning: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub percent_above: Option<Decimal>,
}

/// Denominador de la forma cerrada: `25 - 0.75 * M` con el ratio actual
fn margin_denominator(target_margin: Decimal) -> Option<Decimal> {
    let linehaul_share = LINEHAUL_COST_RATIO.checked_mul(target_margin)?;
    ((Decimal::ONE - LINEHAUL_COST_RATIO) * Decimal::ONE_HUNDRED).checked_sub(linehaul_share)
}

/// `C * (100 + M) / denominador / distancia`, `None` si no entra en `Decimal`
fn solve_rate(inputs: &CostInputs, target_margin: Decimal, denominator: Decimal) -> Option<Decimal> {
    let markup = Decimal::ONE_HUNDRED.checked_add(target_margin)?;
    let required_revenue = inputs.other_costs().checked_mul(markup)?.checked_div(denominator)?;
    required_revenue.checked_div(inputs.distance)
}

/// Calcular la tarifa por milla que alcanza `target_margin`.
///
/// Devuelve la tarifa actual sin cambios cuando la distancia es cero o
/// cuando el margen objetivo no es alcanzable con el ratio de linehaul fijo.
/// Nunca devuelve una tarifa negativa ni entra en pánico.
pub fn calculate_optimal_rate(inputs: &CostInputs, target_margin: Decimal) -> Decimal {
    if inputs.distance.is_zero() {
        return inputs.base_rate;
    }

    let optimal_rate = margin_denominator(target_margin)
        .filter(|denominator| *denominator > Decimal::ZERO)
        .and_then(|denominator| solve_rate(inputs, target_margin, denominator))
        .filter(|rate| *rate <= MAX_RATE_PER_MILE);

    match optimal_rate {
        Some(rate) => rate.max(Decimal::ZERO),
        None => {
            log::debug!("⚠️ Margen objetivo {}% fuera de alcance, tarifa sin cambios", target_margin);
            inputs.base_rate
        }
    }
}

/// Aplicar los límites `min_rate` / `max_rate`; si se contradicen gana el máximo
pub fn clamp_rate(rate: Decimal, options: &SolveOptions) -> Decimal {
    let rate = rate.max(options.min_rate);
    match options.max_rate {
        Some(max_rate) => rate.min(max_rate),
        None => rate,
    }
}

/// Resolver un lane sin modificarlo
pub fn solve_lane(lane: &Lane, target_margin: Decimal, options: &SolveOptions) -> SolutionRecord {
    let inputs = lane.cost_inputs();
    let optimal_rate = clamp_rate(calculate_optimal_rate(&inputs, target_margin), options);

    // Margen y chequeo sobre la tarifa que efectivamente se aplicará
    let new_rate = cost_model::round_rate(optimal_rate);
    let new_margin = cost_model::compute_margin(&inputs.with_base_rate(new_rate)).margin;

    let (rate_too_high, rate_warning, percent_above) = if options.flag_high_rates {
        let check = anomaly_detector::check_rate_too_high(
            new_rate,
            lane.benchmark(),
            lane.historical_rate(),
            options.high_rate_threshold,
        );
        (check.is_too_high, check.reason, Some(check.percent_above))
    } else {
        (false, None, None)
    };

    SolutionRecord {
        lane_id: lane.id().to_string(),
        original_rate: lane.base_rate(),
        optimal_rate,
        new_rate,
        new_margin,
        target_margin,
        rate_too_high,
        rate_warning,
        percent_above,
    }
}

/// Pre-solve en lote: una solución por lane, en el mismo orden de entrada
pub fn pre_solve_rates(lanes: &[Lane], target_margin: Decimal, options: &SolveOptions) -> Vec<SolutionRecord> {
    let solutions: Vec<SolutionRecord> = lanes
        .iter()
        .map(|lane| solve_lane(lane, target_margin, options))
        .collect();

    let flagged = solutions.iter().filter(|s| s.rate_too_high).count();
    log::info!(
        "🧮 Pre-solve: {} lanes a {}% de margen, {} tarifas marcadas",
        solutions.len(),
        target_margin,
        flagged
    );

    solutions
}
