use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::pricing_dto::SolveOptionsRequest;
use crate::models::lane::NewLane;
use crate::models::rfp::{ExportFormat, Rfp, RfpStatus};
use crate::models::scenario::ScenarioKind;
use crate::services::rate_solver::SolutionRecord;
use crate::services::rfp_analytics::{compute_stats, RfpStats};
use crate::utils::validation::validate_not_blank;

// Request para crear un RFP
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRfpRequest {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub shipper: String,

    #[validate]
    #[serde(default)]
    pub lanes: Vec<NewLane>,

    /// Lanes demo a generar además de los recibidos
    #[validate(range(max = 5000))]
    pub generate_lanes: Option<usize>,
}

// Response resumida de un RFP para listados
#[derive(Debug, Serialize)]
pub struct RfpSummary {
    pub id: Uuid,
    pub shipper: String,
    pub status: RfpStatus,
    pub stats: RfpStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Rfp> for RfpSummary {
    fn from(rfp: &Rfp) -> Self {
        Self {
            id: rfp.id,
            shipper: rfp.shipper.clone(),
            status: rfp.status,
            stats: compute_stats(&rfp.lanes),
            created_at: rfp.created_at,
            updated_at: rfp.updated_at,
        }
    }
}

// Request de pre-solve sobre los lanes de un RFP
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RfpPreSolveRequest {
    pub target_margin: Option<Decimal>,
    /// Lanes a resolver; todos si se omite
    pub lane_ids: Option<Vec<String>>,
    #[validate]
    pub options: Option<SolveOptionsRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ApplySolutionsRequest {
    pub solutions: Vec<SolutionRecord>,
}

#[derive(Debug, Serialize)]
pub struct ApplySolutionsResponse {
    pub applied: usize,
    pub stats: RfpStats,
}

// Request para aplicar un escenario de pricing en lote
#[derive(Debug, Deserialize, Validate)]
pub struct ApplyScenarioRequest {
    pub scenario: ScenarioKind,
    /// Margen objetivo que reemplaza el punto medio del escenario
    pub margin_override: Option<Decimal>,
    pub lane_ids: Option<Vec<String>>,
    #[validate]
    pub options: Option<SolveOptionsRequest>,
}

// Antes/después de un lane al aplicar un escenario
#[derive(Debug, Serialize)]
pub struct ScenarioChange {
    pub lane_id: String,
    pub origin: String,
    pub destination: String,
    pub before_rate: Decimal,
    pub before_margin: Decimal,
    pub after_rate: Decimal,
    pub after_margin: Decimal,
    pub rate_change: Decimal,
    pub margin_change: Decimal,
    pub rate_too_high: bool,
    pub rate_warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplyScenarioResponse {
    pub scenario: ScenarioKind,
    pub target_margin: Decimal,
    pub lanes_affected: usize,
    pub avg_rate_change: Decimal,
    pub avg_margin_change: Decimal,
    pub changes: Vec<ScenarioChange>,
}

// Request de envío del RFP
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRfpRequest {
    pub format: ExportFormat,

    #[validate(length(max = 5000))]
    pub narrative: Option<String>,
}
