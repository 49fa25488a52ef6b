use rust_decimal::Decimal;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::pricing_dto::{
    ClassifyRequest, CostInputsRequest, MarginResponse, OptimalRateRequest, OptimalRateResponse,
    PreSolveRequest, RateCheckRequest,
};
use crate::models::lane::Lane;
use crate::models::scenario::{all_scenarios, PricingScenario};
use crate::services::anomaly_detector::{self, RateCheck, DEFAULT_HIGH_RATE_THRESHOLD};
use crate::services::cost_model::{self, CostInputs, MarginClassification};
use crate::services::rate_solver::{self, SolutionRecord, SolveOptions};
use crate::utils::errors::AppError;

/// Endpoints sin estado del motor de pricing
pub struct PricingController {
    defaults: SolveOptions,
    default_target_margin: Decimal,
}

impl PricingController {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            defaults: config.solve_options(),
            default_target_margin: config.default_target_margin,
        }
    }

    pub fn margin(&self, request: CostInputsRequest) -> Result<MarginResponse, AppError> {
        request.validate()?;

        let inputs = CostInputs::from(&request);
        let result = cost_model::compute_margin(&inputs);

        Ok(MarginResponse {
            margin: result.margin,
            status: result.status,
            warnings: result.warnings,
            breakdown: cost_model::cost_breakdown(&inputs),
        })
    }

    /// Clasificar el margen tal como llega, sin redondear
    pub fn classify(&self, request: ClassifyRequest) -> MarginClassification {
        cost_model::classify_margin(request.margin)
    }

    pub fn optimal_rate(&self, request: OptimalRateRequest) -> Result<OptimalRateResponse, AppError> {
        request.validate()?;

        let inputs = CostInputs::from(&request.lane);
        let optimal_rate = rate_solver::calculate_optimal_rate(&inputs, request.target_margin);
        let new_rate = cost_model::round_rate(optimal_rate);
        let realized_margin = cost_model::compute_margin(&inputs.with_base_rate(new_rate)).margin;

        Ok(OptimalRateResponse {
            optimal_rate,
            new_rate,
            target_margin: request.target_margin,
            realized_margin,
        })
    }

    pub fn pre_solve(&self, request: PreSolveRequest) -> Result<Vec<SolutionRecord>, AppError> {
        request.validate()?;

        let options = request
            .options
            .unwrap_or_default()
            .resolve(self.defaults.clone());
        let target_margin = request.target_margin.unwrap_or(self.default_target_margin);
        let lanes: Vec<Lane> = request.lanes.into_iter().map(Lane::from).collect();

        Ok(rate_solver::pre_solve_rates(&lanes, target_margin, &options))
    }

    pub fn rate_check(&self, request: RateCheckRequest) -> Result<RateCheck, AppError> {
        request.validate()?;

        Ok(anomaly_detector::check_rate_too_high(
            request.base_rate,
            request.benchmark,
            request.historical_rate,
            request.threshold_percent.unwrap_or(DEFAULT_HIGH_RATE_THRESHOLD),
        ))
    }

    pub fn scenarios(&self) -> Vec<PricingScenario> {
        all_scenarios()
    }
}
