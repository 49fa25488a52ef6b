//! Modelo de RFP
//!
//! Un RFP agrupa los lanes cotizados para un shipper. Mientras está
//! `InProgress` sus lanes se pueden editar y re-cotizar; una vez enviado
//! queda congelado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::lane::Lane;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RfpStatus {
    InProgress,
    Submitted,
}

/// Formato de exportación elegido al enviar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Csv,
    Pdf,
    Json,
}

#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub format: ExportFormat,
    pub narrative: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rfp {
    pub id: Uuid,
    pub shipper: String,
    pub status: RfpStatus,
    pub lanes: Vec<Lane>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submission: Option<Submission>,
}

impl Rfp {
    pub fn new(shipper: String, lanes: Vec<Lane>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            shipper,
            status: RfpStatus::InProgress,
            lanes,
            created_at: now,
            updated_at: now,
            submission: None,
        }
    }

    pub fn is_submitted(&self) -> bool {
        self.status == RfpStatus::Submitted
    }

    pub fn contains_lane(&self, lane_id: &str) -> bool {
        self.lanes.iter().any(|lane| lane.id() == lane_id)
    }

    pub fn find_lane(&self, lane_id: &str) -> Option<&Lane> {
        self.lanes.iter().find(|lane| lane.id() == lane_id)
    }

    pub fn find_lane_mut(&mut self, lane_id: &str) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|lane| lane.id() == lane_id)
    }

    /// Marcar el RFP como modificado
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn submit(&mut self, format: ExportFormat, narrative: Option<String>) {
        let now = Utc::now();
        self.status = RfpStatus::Submitted;
        self.submission = Some(Submission {
            format,
            narrative,
            submitted_at: now,
        });
        self.updated_at = now;
    }
}
