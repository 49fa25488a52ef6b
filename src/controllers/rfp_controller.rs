use std::collections::HashSet;

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::Validate;

use crate::dto::rfp_dto::{
    ApplyScenarioRequest, ApplyScenarioResponse, ApplySolutionsRequest, ApplySolutionsResponse,
    CreateRfpRequest, RfpPreSolveRequest, RfpSummary, ScenarioChange, SubmitRfpRequest,
};
use crate::models::lane::{Lane, LaneEdit, NewLane};
use crate::models::rfp::Rfp;
use crate::services::anomaly_detector::{self, RateCheck};
use crate::services::cost_model::{round_margin, round_rate, MAX_RATE_PER_MILE};
use crate::services::lane_generator;
use crate::services::rate_solver::{self, SolutionRecord};
use crate::services::rfp_analytics::{self, Preflight, RfpStats};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, conflict_error, not_found_error, AppError};

/// Seleccionar lanes por id en el orden pedido; todos si no se indican
fn select_lanes(lanes: &[Lane], lane_ids: Option<&[String]>) -> Result<Vec<Lane>, AppError> {
    match lane_ids {
        None => Ok(lanes.to_vec()),
        Some(ids) => ids
            .iter()
            .map(|id| {
                lanes
                    .iter()
                    .find(|lane| lane.id() == id)
                    .cloned()
                    .ok_or_else(|| not_found_error("Lane", id))
            })
            .collect(),
    }
}

fn ensure_unique_ids(lanes: &[Lane]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for lane in lanes {
        if !seen.insert(lane.id()) {
            return Err(conflict_error("Lane", "id", lane.id()));
        }
    }
    Ok(())
}

/// Aplicar soluciones sobre un RFP; valida todas antes de tocar un lane
fn apply_solutions_to(rfp: &mut Rfp, solutions: &[SolutionRecord]) -> Result<(), AppError> {
    for solution in solutions {
        if !rfp.contains_lane(&solution.lane_id) {
            return Err(not_found_error("Lane", &solution.lane_id));
        }
        if solution.new_rate < Decimal::ZERO || solution.new_rate > MAX_RATE_PER_MILE {
            return Err(bad_request_error(&format!(
                "new_rate for lane '{}' must be between 0 and {}",
                solution.lane_id, MAX_RATE_PER_MILE
            )));
        }
    }

    for solution in solutions {
        if let Some(lane) = rfp.find_lane_mut(&solution.lane_id) {
            lane.apply_solution(solution);
        }
    }
    Ok(())
}

fn average(values: impl Iterator<Item = Decimal>, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    values.sum::<Decimal>() / Decimal::from(count)
}

pub struct RfpController {
    state: AppState,
}

impl RfpController {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn create(&self, request: CreateRfpRequest) -> Result<Rfp, AppError> {
        request.validate()?;

        let mut lanes: Vec<Lane> = request.lanes.into_iter().map(Lane::from).collect();
        if let Some(count) = request.generate_lanes {
            let generated = lane_generator::generate_lanes_from(lanes.len(), count, &mut rand::thread_rng());
            lanes.extend(generated);
        }
        ensure_unique_ids(&lanes)?;

        let rfp = Rfp::new(request.shipper, lanes);
        log::info!("📋 Creando RFP '{}' con {} lanes", rfp.shipper, rfp.lanes.len());
        self.state.insert_rfp(rfp.clone()).await;
        Ok(rfp)
    }

    pub async fn list(&self) -> Vec<RfpSummary> {
        self.state
            .list_rfps()
            .await
            .iter()
            .map(RfpSummary::from)
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<Rfp, AppError> {
        self.state.get_rfp(id).await
    }

    pub async fn add_lane(&self, id: Uuid, request: NewLane) -> Result<Lane, AppError> {
        request.validate()?;

        self.state
            .update_rfp(id, |rfp| {
                if rfp.contains_lane(&request.id) {
                    return Err(conflict_error("Lane", "id", &request.id));
                }
                let lane = Lane::from(request);
                rfp.lanes.push(lane.clone());
                Ok(lane)
            })
            .await
    }

    pub async fn edit_lane(&self, id: Uuid, lane_id: &str, request: LaneEdit) -> Result<Lane, AppError> {
        request.validate()?;

        self.state
            .update_rfp(id, |rfp| {
                let lane = rfp
                    .find_lane_mut(lane_id)
                    .ok_or_else(|| not_found_error("Lane", lane_id))?;
                lane.edit(request);
                log::debug!("✏️ Lane {} editado: margen {} ({:?})", lane_id, lane.margin(), lane.status());
                Ok(lane.clone())
            })
            .await
    }

    pub async fn delete_lane(&self, id: Uuid, lane_id: &str) -> Result<(), AppError> {
        self.state
            .update_rfp(id, |rfp| {
                let before = rfp.lanes.len();
                rfp.lanes.retain(|lane| lane.id() != lane_id);
                if rfp.lanes.len() == before {
                    return Err(not_found_error("Lane", lane_id));
                }
                Ok(())
            })
            .await
    }

    /// Chequear la tarifa actual de un lane contra sus referencias
    pub async fn lane_rate_check(&self, id: Uuid, lane_id: &str) -> Result<RateCheck, AppError> {
        let rfp = self.state.get_rfp(id).await?;
        let lane = rfp
            .find_lane(lane_id)
            .ok_or_else(|| not_found_error("Lane", lane_id))?;
        Ok(anomaly_detector::check_lane(lane, Some(self.state.config.high_rate_threshold)))
    }

    /// Previsualizar soluciones sin modificar el RFP
    pub async fn pre_solve(&self, id: Uuid, request: RfpPreSolveRequest) -> Result<Vec<SolutionRecord>, AppError> {
        request.validate()?;

        let rfp = self.state.get_rfp(id).await?;
        let lanes = select_lanes(&rfp.lanes, request.lane_ids.as_deref())?;
        let options = request
            .options
            .unwrap_or_default()
            .resolve(self.state.config.solve_options());
        let target_margin = request
            .target_margin
            .unwrap_or(self.state.config.default_target_margin);

        Ok(rate_solver::pre_solve_rates(&lanes, target_margin, &options))
    }

    pub async fn apply_solutions(&self, id: Uuid, request: ApplySolutionsRequest) -> Result<ApplySolutionsResponse, AppError> {
        self.state
            .update_rfp(id, |rfp| {
                apply_solutions_to(rfp, &request.solutions)?;
                log::info!("✅ {} soluciones aplicadas al RFP {}", request.solutions.len(), rfp.id);
                Ok(ApplySolutionsResponse {
                    applied: request.solutions.len(),
                    stats: rfp_analytics::compute_stats(&rfp.lanes),
                })
            })
            .await
    }

    /// Resolver y aplicar un escenario de pricing sobre los lanes elegidos
    pub async fn apply_scenario(&self, id: Uuid, request: ApplyScenarioRequest) -> Result<ApplyScenarioResponse, AppError> {
        request.validate()?;

        let target_margin = request
            .margin_override
            .unwrap_or_else(|| request.scenario.target_margin());
        let options = request
            .options
            .unwrap_or_default()
            .resolve(self.state.config.solve_options());

        self.state
            .update_rfp(id, |rfp| {
                let selected = select_lanes(&rfp.lanes, request.lane_ids.as_deref())?;
                let solutions = rate_solver::pre_solve_rates(&selected, target_margin, &options);
                apply_solutions_to(rfp, &solutions)?;

                let changes: Vec<ScenarioChange> = selected
                    .iter()
                    .zip(&solutions)
                    .map(|(before, solution)| ScenarioChange {
                        lane_id: solution.lane_id.clone(),
                        origin: before.origin().to_string(),
                        destination: before.destination().to_string(),
                        before_rate: before.base_rate(),
                        before_margin: before.margin(),
                        after_rate: solution.new_rate,
                        after_margin: solution.new_margin,
                        rate_change: solution.new_rate - before.base_rate(),
                        margin_change: solution.new_margin - before.margin(),
                        rate_too_high: solution.rate_too_high,
                        rate_warning: solution.rate_warning.clone(),
                    })
                    .collect();

                for change in &changes {
                    if let Some(lane) = rfp.find_lane_mut(&change.lane_id) {
                        lane.tag_scenario(request.scenario);
                    }
                }

                log::info!(
                    "🎯 Escenario {} ({}%) aplicado a {} lanes del RFP {}",
                    request.scenario.name(),
                    target_margin,
                    changes.len(),
                    rfp.id
                );

                Ok(ApplyScenarioResponse {
                    scenario: request.scenario,
                    target_margin,
                    lanes_affected: changes.len(),
                    avg_rate_change: round_rate(average(changes.iter().map(|c| c.rate_change), changes.len())),
                    avg_margin_change: round_margin(average(changes.iter().map(|c| c.margin_change), changes.len())),
                    changes,
                })
            })
            .await
    }

    pub async fn stats(&self, id: Uuid) -> Result<RfpStats, AppError> {
        let rfp = self.state.get_rfp(id).await?;
        Ok(rfp_analytics::compute_stats(&rfp.lanes))
    }

    pub async fn preflight(&self, id: Uuid) -> Result<Preflight, AppError> {
        let rfp = self.state.get_rfp(id).await?;
        Ok(rfp_analytics::preflight(&rfp.lanes))
    }

    pub async fn submit(&self, id: Uuid, request: SubmitRfpRequest) -> Result<Rfp, AppError> {
        request.validate()?;

        self.state
            .update_rfp(id, |rfp| {
                let check = rfp_analytics::preflight(&rfp.lanes);
                if !check.ready {
                    return Err(AppError::Conflict(format!(
                        "RFP '{}' failed submission preflight",
                        rfp.id
                    )));
                }
                rfp.submit(request.format, request.narrative);
                log::info!("📤 RFP {} enviado como {:?}", rfp.id, request.format);
                Ok(rfp.clone())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::environment::EnvironmentConfig;
    use crate::models::lane::LaneStatus;
    use crate::models::scenario::ScenarioKind;
    use rust_decimal_macros::dec;

    fn new_lane(id: &str) -> NewLane {
        NewLane {
            id: id.to_string(),
            origin: "Los Angeles, CA".to_string(),
            destination: "Seattle, WA".to_string(),
            equipment: "Dry Van".to_string(),
            volume: 3,
            distance: dec!(500),
            base_rate: dec!(2.00),
            fuel_surcharge: dec!(0.30),
            accessorials: dec!(100),
            deadhead: 50,
            benchmark: None,
            historical_rate: None,
        }
    }

    async fn controller_with_rfp() -> (RfpController, Uuid) {
        let controller = RfpController::new(AppState::new(EnvironmentConfig::default()));
        let rfp = controller
            .create(CreateRfpRequest {
                shipper: "Industrial Supply Co".to_string(),
                lanes: vec![new_lane("LANE-0001"), new_lane("LANE-0002")],
                generate_lanes: None,
            })
            .await
            .unwrap();
        (controller, rfp.id)
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_lane_ids() {
        let controller = RfpController::new(AppState::new(EnvironmentConfig::default()));
        let result = controller
            .create(CreateRfpRequest {
                shipper: "Retail Corp".to_string(),
                lanes: vec![new_lane("LANE-0001"), new_lane("LANE-0001")],
                generate_lanes: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_with_generated_lanes() {
        let controller = RfpController::new(AppState::new(EnvironmentConfig::default()));
        let rfp = controller
            .create(CreateRfpRequest {
                shipper: "Retail Corp".to_string(),
                lanes: vec![new_lane("MANUAL-1")],
                generate_lanes: Some(5),
            })
            .await
            .unwrap();

        assert_eq!(rfp.lanes.len(), 6);
        assert_eq!(rfp.lanes[1].id(), "LANE-0002");
    }

    #[tokio::test]
    async fn test_pre_solve_does_not_mutate() {
        let (controller, id) = controller_with_rfp().await;
        let solutions = controller
            .pre_solve(id, RfpPreSolveRequest::default())
            .await
            .unwrap();

        assert_eq!(solutions.len(), 2);
        assert_eq!(solutions[0].new_rate, dec!(4.55));

        let rfp = controller.get(id).await.unwrap();
        assert_eq!(rfp.lanes[0].base_rate(), dec!(2.00));
    }

    #[tokio::test]
    async fn test_lane_rate_check() {
        let (controller, id) = controller_with_rfp().await;
        let check = controller.lane_rate_check(id, "LANE-0001").await.unwrap();
        assert!(!check.is_too_high);

        let result = controller.lane_rate_check(id, "LANE-0404").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_apply_solutions_is_atomic() {
        let (controller, id) = controller_with_rfp().await;
        let mut solutions = controller
            .pre_solve(id, RfpPreSolveRequest::default())
            .await
            .unwrap();
        solutions[1].lane_id = "LANE-9999".to_string();

        let result = controller
            .apply_solutions(id, ApplySolutionsRequest { solutions })
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // Ningún lane cambió
        let rfp = controller.get(id).await.unwrap();
        assert_eq!(rfp.lanes[0].base_rate(), dec!(2.00));
        assert_eq!(rfp.lanes[0].status(), LaneStatus::Error);
    }

    #[tokio::test]
    async fn test_apply_solutions_rejects_out_of_range_rate() {
        let (controller, id) = controller_with_rfp().await;
        let mut solutions = controller
            .pre_solve(id, RfpPreSolveRequest::default())
            .await
            .unwrap();
        solutions[0].new_rate = Decimal::from(1_000_000_000_000_000_000_i64);

        let result = controller
            .apply_solutions(id, ApplySolutionsRequest { solutions })
            .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let rfp = controller.get(id).await.unwrap();
        assert_eq!(rfp.lanes[0].base_rate(), dec!(2.00));
    }

    #[tokio::test]
    async fn test_edit_lane_rejects_overflowing_values() {
        let (controller, id) = controller_with_rfp().await;
        let result = controller
            .edit_lane(
                id,
                "LANE-0001",
                LaneEdit {
                    base_rate: Some(Decimal::from(1_000_000_000_000_000_000_i64)),
                    distance: Some(Decimal::from(1_000_000_000_000_000_i64)),
                    ..LaneEdit::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let rfp = controller.get(id).await.unwrap();
        let lane = rfp.find_lane("LANE-0001").unwrap();
        assert_eq!(lane.base_rate(), dec!(2.00));
        assert_eq!(lane.distance(), dec!(500));
        assert_eq!(lane.margin(), dec!(-7.0));
    }

    #[tokio::test]
    async fn test_apply_scenario_selected_lanes() {
        let (controller, id) = controller_with_rfp().await;
        let response = controller
            .apply_scenario(
                id,
                ApplyScenarioRequest {
                    scenario: ScenarioKind::Base,
                    margin_override: Some(dec!(12)),
                    lane_ids: Some(vec!["LANE-0002".to_string()]),
                    options: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(response.lanes_affected, 1);
        assert_eq!(response.avg_rate_change, dec!(2.55));
        assert_eq!(response.avg_margin_change, dec!(19.0));

        let rfp = controller.get(id).await.unwrap();
        let lane = rfp.find_lane("LANE-0002").unwrap();
        assert_eq!(lane.base_rate(), dec!(4.55));
        assert_eq!(lane.status(), LaneStatus::Valid);
        assert_eq!(lane.scenario(), Some(ScenarioKind::Base));
        assert_eq!(rfp.find_lane("LANE-0001").unwrap().scenario(), None);
    }

    #[tokio::test]
    async fn test_submit_requires_clean_preflight() {
        let (controller, id) = controller_with_rfp().await;
        let submit = || SubmitRfpRequest {
            format: crate::models::rfp::ExportFormat::Excel,
            narrative: Some("Capacity committed on all lanes".to_string()),
        };

        let result = controller.submit(id, submit()).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        controller
            .apply_scenario(
                id,
                ApplyScenarioRequest {
                    scenario: ScenarioKind::Defensive,
                    margin_override: None,
                    lane_ids: None,
                    options: None,
                },
            )
            .await
            .unwrap();

        let rfp = controller.submit(id, submit()).await.unwrap();
        assert!(rfp.is_submitted());

        // Un RFP enviado ya no acepta cambios
        let result = controller.delete_lane(id, "LANE-0001").await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }
}
