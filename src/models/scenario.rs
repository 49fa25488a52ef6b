//! Escenarios de pricing
//!
//! Cada escenario define un rango de margen objetivo; el pre-solve en lote
//! apunta al punto medio del rango salvo que el analista lo sobreescriba.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    Aggressive,
    Base,
    Defensive,
}

/// Perfil de un escenario tal como se expone en la API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingScenario {
    pub id: ScenarioKind,
    pub name: &'static str,
    pub margin_min: Decimal,
    pub margin_max: Decimal,
    /// Rango legible, p. ej. "10-12%"
    pub margin_target: String,
    pub target_margin: Decimal,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [
        ScenarioKind::Aggressive,
        ScenarioKind::Base,
        ScenarioKind::Defensive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::Aggressive => "Aggressive",
            ScenarioKind::Base => "Base",
            ScenarioKind::Defensive => "Defensive",
        }
    }

    /// Rango de margen (mínimo, máximo) en porcentaje
    pub fn margin_range(&self) -> (Decimal, Decimal) {
        match self {
            ScenarioKind::Aggressive => (Decimal::from(5), Decimal::from(8)),
            ScenarioKind::Base => (Decimal::from(10), Decimal::from(12)),
            ScenarioKind::Defensive => (Decimal::from(15), Decimal::from(18)),
        }
    }

    /// Punto medio del rango
    pub fn target_margin(&self) -> Decimal {
        let (min, max) = self.margin_range();
        (min + max) / Decimal::TWO
    }

    pub fn profile(&self) -> PricingScenario {
        let (margin_min, margin_max) = self.margin_range();
        PricingScenario {
            id: *self,
            name: self.name(),
            margin_min,
            margin_max,
            margin_target: format!("{}-{}%", margin_min, margin_max),
            target_margin: self.target_margin(),
        }
    }
}

/// Todos los escenarios en orden de agresividad
pub fn all_scenarios() -> Vec<PricingScenario> {
    ScenarioKind::ALL.iter().map(ScenarioKind::profile).collect()
}
