//! Estadísticas y preflight de envío de un RFP

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::lane::{Lane, LaneStatus};
use crate::services::cost_model::round_margin;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfpStats {
    pub lane_count: usize,
    pub valid: usize,
    pub warnings: usize,
    pub errors: usize,
    /// Promedio de márgenes (1 decimal); 0.0 sin lanes
    pub avg_margin: Decimal,
    pub total_volume: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreflightCheck {
    pub id: &'static str,
    pub label: &'static str,
    pub count: usize,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preflight {
    pub ready: bool,
    pub checks: Vec<PreflightCheck>,
}

fn count_status(lanes: &[Lane], status: LaneStatus) -> usize {
    lanes.iter().filter(|lane| lane.status() == status).count()
}

pub fn compute_stats(lanes: &[Lane]) -> RfpStats {
    let avg_margin = if lanes.is_empty() {
        Decimal::ZERO
    } else {
        let total: Decimal = lanes.iter().map(Lane::margin).sum();
        total / Decimal::from(lanes.len())
    };

    RfpStats {
        lane_count: lanes.len(),
        valid: count_status(lanes, LaneStatus::Valid),
        warnings: count_status(lanes, LaneStatus::Warning),
        errors: count_status(lanes, LaneStatus::Error),
        avg_margin: round_margin(avg_margin),
        total_volume: lanes.iter().map(|lane| u64::from(lane.volume())).sum(),
    }
}

/// Chequeos previos al envío; el RFP está listo si ninguno falla
pub fn preflight(lanes: &[Lane]) -> Preflight {
    let errors = count_status(lanes, LaneStatus::Error);
    let warnings = count_status(lanes, LaneStatus::Warning);

    let checks = vec![
        PreflightCheck {
            id: "lanes",
            label: "Lanes",
            count: lanes.len(),
            status: if lanes.is_empty() { CheckStatus::Fail } else { CheckStatus::Pass },
        },
        PreflightCheck {
            id: "errors",
            label: "Errors",
            count: errors,
            status: if errors == 0 { CheckStatus::Pass } else { CheckStatus::Fail },
        },
        PreflightCheck {
            id: "warnings",
            label: "Warnings",
            count: warnings,
            status: if warnings == 0 { CheckStatus::Pass } else { CheckStatus::Warning },
        },
    ];

    let ready = checks.iter().all(|check| check.status != CheckStatus::Fail);
    Preflight { ready, checks }
}
