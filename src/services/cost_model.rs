//! Modelo de costos de un lane
//!
//! Traduce la tarifa y los costos de un lane a un costo total y a un margen
//! porcentual, y clasifica ese margen. Es la única fuente de los campos
//! derivados (`margin`, `status`, `warnings`): todo camino que modifica un
//! lane pasa por aquí.
//!
//! El linehaul no se observa: se estima como una fracción fija del revenue.
//!
//! La aritmética usa los operadores de `Decimal` sin chequeo: las entradas
//! deben estar dentro de `MAX_RATE_PER_MILE`, `MAX_DISTANCE` y `MAX_AMOUNT`,
//! lo que mantiene revenue y costo total por debajo de 1e13.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::lane::LaneStatus;

/// Fracción del revenue estimada como costo de linehaul (75%)
pub const LINEHAUL_COST_RATIO: Decimal = Decimal::from_parts(75, 0, 0, false, 2);

/// Costo interno por milla de deadhead ($1.50)
pub const DEADHEAD_COST_PER_MILE: Decimal = Decimal::from_parts(150, 0, 0, false, 2);

/// Margen por convención cuando el costo total es cero
pub const ZERO_COST_DEFAULT_MARGIN: Decimal = Decimal::from_parts(100, 0, 0, false, 1);

/// Margen por debajo del cual el lane queda en `Error`
pub const ERROR_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Margen por debajo del cual el lane queda en `Warning`
pub const WARNING_THRESHOLD: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

pub const MARGIN_BELOW_THRESHOLD: &str = "Margin below threshold";

/// Tarifa por milla máxima aceptada como entrada (tarifa, fuel, referencias)
pub const MAX_RATE_PER_MILE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Distancia máxima aceptada en millas
pub const MAX_DISTANCE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Monto fijo máximo aceptado (accesoriales)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Entradas numéricas del modelo de costos
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostInputs {
    pub base_rate: Decimal,
    pub distance: Decimal,
    pub fuel_surcharge: Decimal,
    pub accessorials: Decimal,
    pub deadhead: u32,
}

impl CostInputs {
    /// Mismas entradas con otra tarifa por milla
    pub fn with_base_rate(self, base_rate: Decimal) -> Self {
        Self { base_rate, ..self }
    }

    pub fn revenue(&self) -> Decimal {
        self.base_rate * self.distance
    }

    pub fn fuel_cost(&self) -> Decimal {
        self.fuel_surcharge * self.distance
    }

    pub fn deadhead_cost(&self) -> Decimal {
        Decimal::from(self.deadhead) * DEADHEAD_COST_PER_MILE
    }

    /// Todos los costos salvo el linehaul estimado
    pub fn other_costs(&self) -> Decimal {
        self.fuel_cost() + self.accessorials + self.deadhead_cost()
    }
}

/// Desglose del cost stack de un lane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub revenue: Decimal,
    pub estimated_linehaul_cost: Decimal,
    pub fuel_cost: Decimal,
    pub accessorials: Decimal,
    pub deadhead_cost: Decimal,
    pub total_cost: Decimal,
    /// Margen sin redondear
    pub margin: Decimal,
}

/// Estado y warnings derivados de un margen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarginClassification {
    pub status: LaneStatus,
    pub warnings: Vec<String>,
}

/// Margen redondeado a un decimal con su clasificación
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginResult {
    pub margin: Decimal,
    pub status: LaneStatus,
    pub warnings: Vec<String>,
}

/// Redondeo estilo `toFixed`: mitad lejos de cero y escala fija
pub fn round_fixed(value: Decimal, decimals: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded
}

/// Margen con la precisión que se almacena y compara (1 decimal)
pub fn round_margin(margin: Decimal) -> Decimal {
    round_fixed(margin, 1)
}

/// Tarifa con la precisión que se aplica a un lane (2 decimales)
pub fn round_rate(rate: Decimal) -> Decimal {
    round_fixed(rate, 2)
}

/// Calcular el cost stack completo de un lane
pub fn cost_breakdown(inputs: &CostInputs) -> CostBreakdown {
    let revenue = inputs.revenue();
    let estimated_linehaul_cost = revenue * LINEHAUL_COST_RATIO;
    let fuel_cost = inputs.fuel_cost();
    let deadhead_cost = inputs.deadhead_cost();
    let total_cost = estimated_linehaul_cost + fuel_cost + inputs.accessorials + deadhead_cost;

    let margin = if total_cost > Decimal::ZERO {
        (revenue - total_cost) / total_cost * Decimal::ONE_HUNDRED
    } else {
        ZERO_COST_DEFAULT_MARGIN
    };

    CostBreakdown {
        revenue,
        estimated_linehaul_cost,
        fuel_cost,
        accessorials: inputs.accessorials,
        deadhead_cost,
        total_cost,
        margin,
    }
}

/// Clasificar un margen según los umbrales fijos.
///
/// El límite inferior de cada banda es inclusivo: 8.0 es `Warning` y
/// 12.0 es `Valid`.
pub fn classify_margin(margin: Decimal) -> MarginClassification {
    if margin < ERROR_THRESHOLD {
        MarginClassification {
            status: LaneStatus::Error,
            warnings: vec![MARGIN_BELOW_THRESHOLD.to_string()],
        }
    } else if margin < WARNING_THRESHOLD {
        MarginClassification {
            status: LaneStatus::Warning,
            warnings: Vec::new(),
        }
    } else {
        MarginClassification {
            status: LaneStatus::Valid,
            warnings: Vec::new(),
        }
    }
}

/// Calcular margen redondeado, estado y warnings de un lane
pub fn compute_margin(inputs: &CostInputs) -> MarginResult {
    let margin = round_margin(cost_breakdown(inputs).margin);
    let MarginClassification { status, warnings } = classify_margin(margin);

    MarginResult {
        margin,
        status,
        warnings,
    }
}
