use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::rfp_controller::RfpController;
use crate::dto::rfp_dto::{
    ApplyScenarioRequest, ApplyScenarioResponse, ApplySolutionsRequest, ApplySolutionsResponse,
    CreateRfpRequest, RfpPreSolveRequest, RfpSummary, SubmitRfpRequest,
};
use crate::dto::ApiResponse;
use crate::models::lane::{Lane, LaneEdit, NewLane};
use crate::models::rfp::Rfp;
use crate::services::anomaly_detector::RateCheck;
use crate::services::rate_solver::SolutionRecord;
use crate::services::rfp_analytics::{Preflight, RfpStats};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rfp_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_rfp).get(list_rfps))
        .route("/:id", get(get_rfp))
        .route("/:id/lanes", post(add_lane))
        .route("/:id/lanes/:lane_id", put(edit_lane).delete(delete_lane))
        .route("/:id/lanes/:lane_id/rate-check", get(lane_rate_check))
        .route("/:id/pre-solve", post(pre_solve))
        .route("/:id/apply-solutions", post(apply_solutions))
        .route("/:id/scenario", post(apply_scenario))
        .route("/:id/stats", get(stats))
        .route("/:id/preflight", get(preflight))
        .route("/:id/submit", post(submit))
}

async fn create_rfp(
    State(state): State<AppState>,
    Json(request): Json<CreateRfpRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Rfp>>), AppError> {
    let controller = RfpController::new(state);
    let rfp = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(rfp))))
}

async fn list_rfps(State(state): State<AppState>) -> Json<ApiResponse<Vec<RfpSummary>>> {
    let controller = RfpController::new(state);
    Json(ApiResponse::success(controller.list().await))
}

async fn get_rfp(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Rfp>>, AppError> {
    let controller = RfpController::new(state);
    let rfp = controller.get(id).await?;
    Ok(Json(ApiResponse::success(rfp)))
}

async fn add_lane(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NewLane>,
) -> Result<(StatusCode, Json<ApiResponse<Lane>>), AppError> {
    let controller = RfpController::new(state);
    let lane = controller.add_lane(id, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(lane))))
}

async fn edit_lane(
    State(state): State<AppState>,
    Path((id, lane_id)): Path<(Uuid, String)>,
    Json(request): Json<LaneEdit>,
) -> Result<Json<ApiResponse<Lane>>, AppError> {
    let controller = RfpController::new(state);
    let lane = controller.edit_lane(id, &lane_id, request).await?;
    Ok(Json(ApiResponse::success(lane)))
}

async fn delete_lane(
    State(state): State<AppState>,
    Path((id, lane_id)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RfpController::new(state);
    controller.delete_lane(id, &lane_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Lane {} eliminado", lane_id)
    })))
}

async fn lane_rate_check(
    State(state): State<AppState>,
    Path((id, lane_id)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<RateCheck>>, AppError> {
    let controller = RfpController::new(state);
    let check = controller.lane_rate_check(id, &lane_id).await?;
    Ok(Json(ApiResponse::success(check)))
}

async fn pre_solve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RfpPreSolveRequest>,
) -> Result<Json<ApiResponse<Vec<SolutionRecord>>>, AppError> {
    let controller = RfpController::new(state);
    let solutions = controller.pre_solve(id, request).await?;
    Ok(Json(ApiResponse::success(solutions)))
}

async fn apply_solutions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplySolutionsRequest>,
) -> Result<Json<ApiResponse<ApplySolutionsResponse>>, AppError> {
    let controller = RfpController::new(state);
    let response = controller.apply_solutions(id, request).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn apply_scenario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ApplyScenarioRequest>,
) -> Result<Json<ApiResponse<ApplyScenarioResponse>>, AppError> {
    let controller = RfpController::new(state);
    let response = controller.apply_scenario(id, request).await?;
    let message = format!(
        "Escenario {} aplicado a {} lanes",
        response.scenario.name(),
        response.lanes_affected
    );
    Ok(Json(ApiResponse::success_with_message(response, message)))
}

async fn stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RfpStats>>, AppError> {
    let controller = RfpController::new(state);
    let stats = controller.stats(id).await?;
    Ok(Json(ApiResponse::success(stats)))
}

async fn preflight(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Preflight>>, AppError> {
    let controller = RfpController::new(state);
    let preflight = controller.preflight(id).await?;
    Ok(Json(ApiResponse::success(preflight)))
}

async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRfpRequest>,
) -> Result<Json<ApiResponse<Rfp>>, AppError> {
    let controller = RfpController::new(state);
    let rfp = controller.submit(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(rfp, "RFP enviado".to_string())))
}
