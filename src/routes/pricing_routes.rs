use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::pricing_controller::PricingController;
use crate::dto::pricing_dto::{
    ClassifyRequest, CostInputsRequest, MarginResponse, OptimalRateRequest, OptimalRateResponse,
    PreSolveRequest, RateCheckRequest,
};
use crate::dto::ApiResponse;
use crate::models::scenario::PricingScenario;
use crate::services::anomaly_detector::RateCheck;
use crate::services::cost_model::MarginClassification;
use crate::services::rate_solver::SolutionRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pricing_router() -> Router<AppState> {
    Router::new()
        .route("/margin", post(margin))
        .route("/classify", post(classify))
        .route("/optimal-rate", post(optimal_rate))
        .route("/pre-solve", post(pre_solve))
        .route("/rate-check", post(rate_check))
        .route("/scenarios", get(scenarios))
}

async fn margin(
    State(state): State<AppState>,
    Json(request): Json<CostInputsRequest>,
) -> Result<Json<ApiResponse<MarginResponse>>, AppError> {
    let controller = PricingController::new(&state.config);
    let response = controller.margin(request)?;
    Ok(Json(ApiResponse::success(response)))
}

async fn classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Json<ApiResponse<MarginClassification>> {
    let controller = PricingController::new(&state.config);
    Json(ApiResponse::success(controller.classify(request)))
}

async fn optimal_rate(
    State(state): State<AppState>,
    Json(request): Json<OptimalRateRequest>,
) -> Result<Json<ApiResponse<OptimalRateResponse>>, AppError> {
    let controller = PricingController::new(&state.config);
    let response = controller.optimal_rate(request)?;
    Ok(Json(ApiResponse::success(response)))
}

async fn pre_solve(
    State(state): State<AppState>,
    Json(request): Json<PreSolveRequest>,
) -> Result<Json<ApiResponse<Vec<SolutionRecord>>>, AppError> {
    let controller = PricingController::new(&state.config);
    let solutions = controller.pre_solve(request)?;
    let message = format!("{} lanes resueltos", solutions.len());
    Ok(Json(ApiResponse::success_with_message(solutions, message)))
}

async fn rate_check(
    State(state): State<AppState>,
    Json(request): Json<RateCheckRequest>,
) -> Result<Json<ApiResponse<RateCheck>>, AppError> {
    let controller = PricingController::new(&state.config);
    let response = controller.rate_check(request)?;
    Ok(Json(ApiResponse::success(response)))
}

async fn scenarios(State(state): State<AppState>) -> Json<ApiResponse<Vec<PricingScenario>>> {
    let controller = PricingController::new(&state.config);
    Json(ApiResponse::success(controller.scenarios()))
}
