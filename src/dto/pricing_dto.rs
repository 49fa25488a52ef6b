use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::lane::NewLane;
use crate::services::cost_model::{CostBreakdown, CostInputs};
use crate::services::rate_solver::SolveOptions;
use crate::utils::validation::{
    validate_amount, validate_distance, validate_non_negative, validate_rate,
};

// Entradas de costo de un lane, sin identidad
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CostInputsRequest {
    #[validate(custom = "validate_rate")]
    pub base_rate: Decimal,

    #[validate(custom = "validate_distance")]
    pub distance: Decimal,

    #[validate(custom = "validate_rate")]
    pub fuel_surcharge: Decimal,

    #[validate(custom = "validate_amount")]
    pub accessorials: Decimal,

    #[serde(default)]
    pub deadhead: u32,
}

impl From<&CostInputsRequest> for CostInputs {
    fn from(request: &CostInputsRequest) -> Self {
        CostInputs {
            base_rate: request.base_rate,
            distance: request.distance,
            fuel_surcharge: request.fuel_surcharge,
            accessorials: request.accessorials,
            deadhead: request.deadhead,
        }
    }
}

// Response de margen con el cost stack
#[derive(Debug, Serialize)]
pub struct MarginResponse {
    pub margin: Decimal,
    pub status: crate::models::lane::LaneStatus,
    pub warnings: Vec<String>,
    pub breakdown: CostBreakdown,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub margin: Decimal,
}

// Request para la tarifa óptima de un lane
#[derive(Debug, Deserialize, Validate)]
pub struct OptimalRateRequest {
    #[validate]
    pub lane: CostInputsRequest,
    pub target_margin: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OptimalRateResponse {
    pub optimal_rate: Decimal,
    pub new_rate: Decimal,
    pub target_margin: Decimal,
    /// Margen que produce `new_rate`
    pub realized_margin: Decimal,
}

// Opciones de pre-solve; los campos ausentes toman el default configurado
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SolveOptionsRequest {
    pub flag_high_rates: Option<bool>,

    #[validate(custom = "validate_non_negative")]
    pub high_rate_threshold: Option<Decimal>,

    #[validate(custom = "validate_rate")]
    pub min_rate: Option<Decimal>,

    #[validate(custom = "validate_rate")]
    pub max_rate: Option<Decimal>,
}

impl SolveOptionsRequest {
    pub fn resolve(&self, defaults: SolveOptions) -> SolveOptions {
        SolveOptions {
            flag_high_rates: self.flag_high_rates.unwrap_or(defaults.flag_high_rates),
            high_rate_threshold: self.high_rate_threshold.unwrap_or(defaults.high_rate_threshold),
            min_rate: self.min_rate.unwrap_or(defaults.min_rate),
            max_rate: self.max_rate.or(defaults.max_rate),
        }
    }
}

// Request de pre-solve sobre lanes sueltos
#[derive(Debug, Deserialize, Validate)]
pub struct PreSolveRequest {
    #[validate]
    #[serde(default)]
    pub lanes: Vec<NewLane>,
    pub target_margin: Option<Decimal>,
    #[validate]
    pub options: Option<SolveOptionsRequest>,
}

// Request de chequeo de tarifa alta
#[derive(Debug, Deserialize, Validate)]
pub struct RateCheckRequest {
    #[validate(custom = "validate_rate")]
    pub base_rate: Decimal,

    #[validate(custom = "validate_rate")]
    pub benchmark: Option<Decimal>,

    #[validate(custom = "validate_rate")]
    pub historical_rate: Option<Decimal>,

    #[validate(custom = "validate_non_negative")]
    pub threshold_percent: Option<Decimal>,
}
