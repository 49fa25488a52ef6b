//! Modelo de Lane
//!
//! Un lane es una ruta origen→destino cotizada dentro de un RFP. Los campos
//! derivados (`margin`, `status`, `warnings`) son privados y solo los
//! escribe el modelo de costos: cualquier cambio de tarifa o costos pasa por
//! `edit` o `apply_solution`, que recalculan los tres juntos.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::scenario::ScenarioKind;
use crate::services::cost_model::{self, CostInputs};
use crate::services::rate_solver::SolutionRecord;
use crate::utils::validation::{
    validate_amount, validate_distance, validate_not_blank, validate_positive, validate_rate,
};

/// `validator` 0.16 pasa los campos numéricos por valor, no por referencia
fn validate_positive_u32(value: u32) -> Result<(), validator::ValidationError> {
    validate_positive(&value)
}

/// Clasificación del margen de un lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneStatus {
    Valid,
    Warning,
    Error,
}

/// Lane con sus campos derivados siempre consistentes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    id: String,
    origin: String,
    destination: String,
    equipment: String,
    volume: u32,
    distance: Decimal,
    base_rate: Decimal,
    fuel_surcharge: Decimal,
    accessorials: Decimal,
    deadhead: u32,
    benchmark: Option<Decimal>,
    historical_rate: Option<Decimal>,
    scenario: Option<ScenarioKind>,
    margin: Decimal,
    status: LaneStatus,
    warnings: Vec<String>,
}

fn default_equipment() -> String {
    "Dry Van".to_string()
}

fn default_volume() -> u32 {
    1
}

/// Request para crear un lane (entrada manual, importación o generación)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewLane {
    #[validate(length(min = 1, max = 64), custom = "validate_not_blank")]
    pub id: String,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub origin: String,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub destination: String,

    #[serde(default = "default_equipment")]
    #[validate(length(min = 1, max = 50))]
    pub equipment: String,

    #[serde(default = "default_volume")]
    #[validate(custom = "validate_positive_u32")]
    pub volume: u32,

    #[validate(custom = "validate_distance")]
    pub distance: Decimal,

    #[validate(custom = "validate_rate")]
    pub base_rate: Decimal,

    #[validate(custom = "validate_rate")]
    pub fuel_surcharge: Decimal,

    #[validate(custom = "validate_amount")]
    pub accessorials: Decimal,

    #[serde(default)]
    pub deadhead: u32,

    #[serde(default)]
    #[validate(custom = "validate_rate")]
    pub benchmark: Option<Decimal>,

    #[serde(default)]
    #[validate(custom = "validate_rate")]
    pub historical_rate: Option<Decimal>,
}

/// Distinguir un campo ausente (`None`) de un `null` explícito (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Edición directa de un lane; el id no se puede cambiar
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LaneEdit {
    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub origin: Option<String>,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub destination: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub equipment: Option<String>,

    #[validate(custom = "validate_positive_u32")]
    pub volume: Option<u32>,

    #[validate(custom = "validate_distance")]
    pub distance: Option<Decimal>,

    #[validate(custom = "validate_rate")]
    pub base_rate: Option<Decimal>,

    #[validate(custom = "validate_rate")]
    pub fuel_surcharge: Option<Decimal>,

    #[validate(custom = "validate_amount")]
    pub accessorials: Option<Decimal>,

    pub deadhead: Option<u32>,

    /// `null` borra el benchmark; ausente lo deja como está
    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_rate")]
    pub benchmark: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "double_option")]
    #[validate(custom = "validate_rate")]
    pub historical_rate: Option<Option<Decimal>>,
}

impl From<NewLane> for Lane {
    fn from(new_lane: NewLane) -> Self {
        let mut lane = Self {
            id: new_lane.id,
            origin: new_lane.origin,
            destination: new_lane.destination,
            equipment: new_lane.equipment,
            volume: new_lane.volume,
            distance: new_lane.distance,
            base_rate: new_lane.base_rate,
            fuel_surcharge: new_lane.fuel_surcharge,
            accessorials: new_lane.accessorials,
            deadhead: new_lane.deadhead,
            benchmark: new_lane.benchmark,
            historical_rate: new_lane.historical_rate,
            scenario: None,
            margin: Decimal::ZERO,
            status: LaneStatus::Error,
            warnings: Vec::new(),
        };
        lane.recompute();
        lane
    }
}

impl Lane {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn equipment(&self) -> &str {
        &self.equipment
    }

    pub fn volume(&self) -> u32 {
        self.volume
    }

    pub fn distance(&self) -> Decimal {
        self.distance
    }

    pub fn base_rate(&self) -> Decimal {
        self.base_rate
    }

    pub fn fuel_surcharge(&self) -> Decimal {
        self.fuel_surcharge
    }

    pub fn accessorials(&self) -> Decimal {
        self.accessorials
    }

    pub fn deadhead(&self) -> u32 {
        self.deadhead
    }

    pub fn benchmark(&self) -> Option<Decimal> {
        self.benchmark
    }

    pub fn historical_rate(&self) -> Option<Decimal> {
        self.historical_rate
    }

    pub fn scenario(&self) -> Option<ScenarioKind> {
        self.scenario
    }

    pub fn margin(&self) -> Decimal {
        self.margin
    }

    pub fn status(&self) -> LaneStatus {
        self.status
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Entradas del modelo de costos de este lane
    pub fn cost_inputs(&self) -> CostInputs {
        CostInputs {
            base_rate: self.base_rate,
            distance: self.distance,
            fuel_surcharge: self.fuel_surcharge,
            accessorials: self.accessorials,
            deadhead: self.deadhead,
        }
    }

    fn recompute(&mut self) {
        let result = cost_model::compute_margin(&self.cost_inputs());
        self.margin = result.margin;
        self.status = result.status;
        self.warnings = result.warnings;
    }

    /// Reemplazar el lane por `candidate` una vez recalculado; si el cálculo
    /// falla el lane original queda intacto
    fn commit(&mut self, mut candidate: Lane) {
        candidate.recompute();
        *self = candidate;
    }

    /// Aplicar una edición directa y recalcular los campos derivados
    pub fn edit(&mut self, edit: LaneEdit) {
        let mut candidate = self.clone();
        if let Some(origin) = edit.origin {
            candidate.origin = origin;
        }
        if let Some(destination) = edit.destination {
            candidate.destination = destination;
        }
        if let Some(equipment) = edit.equipment {
            candidate.equipment = equipment;
        }
        if let Some(volume) = edit.volume {
            candidate.volume = volume;
        }
        if let Some(distance) = edit.distance {
            candidate.distance = distance;
        }
        if let Some(base_rate) = edit.base_rate {
            candidate.base_rate = base_rate;
        }
        if let Some(fuel_surcharge) = edit.fuel_surcharge {
            candidate.fuel_surcharge = fuel_surcharge;
        }
        if let Some(accessorials) = edit.accessorials {
            candidate.accessorials = accessorials;
        }
        if let Some(deadhead) = edit.deadhead {
            candidate.deadhead = deadhead;
        }
        if let Some(benchmark) = edit.benchmark {
            candidate.benchmark = benchmark;
        }
        if let Some(historical_rate) = edit.historical_rate {
            candidate.historical_rate = historical_rate;
        }
        self.commit(candidate);
    }

    /// Aplicar la solución del solver: tarifa, margen, estado y warnings juntos
    pub fn apply_solution(&mut self, solution: &SolutionRecord) {
        debug_assert_eq!(solution.lane_id, self.id);
        let mut candidate = self.clone();
        candidate.base_rate = solution.new_rate;
        self.commit(candidate);
    }

    /// Marcar el escenario de pricing aplicado al lane
    pub fn tag_scenario(&mut self, scenario: ScenarioKind) {
        self.scenario = Some(scenario);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::rate_solver::{pre_solve_rates, SolveOptions};
    use rust_decimal_macros::dec;

    fn new_lane() -> NewLane {
        NewLane {
            id: "LANE-0001".to_string(),
            origin: "Chicago, IL".to_string(),
            destination: "Miami, FL".to_string(),
            equipment: "Reefer".to_string(),
            volume: 12,
            distance: dec!(500),
            base_rate: dec!(2.00),
            fuel_surcharge: dec!(0.30),
            accessorials: dec!(100),
            deadhead: 50,
            benchmark: Some(dec!(2.10)),
            historical_rate: None,
        }
    }

    #[test]
    fn test_new_lane_computes_derived_fields() {
        let lane = Lane::from(new_lane());

        assert_eq!(lane.margin(), dec!(-7.0));
        assert_eq!(lane.status(), LaneStatus::Error);
        assert_eq!(lane.warnings(), ["Margin below threshold".to_string()]);
    }

    #[test]
    fn test_edit_recomputes_derived_fields() {
        let mut lane = Lane::from(new_lane());
        lane.edit(LaneEdit {
            base_rate: Some(dec!(4.55)),
            ..LaneEdit::default()
        });

        assert_eq!(lane.margin(), dec!(12.0));
        assert_eq!(lane.status(), LaneStatus::Valid);
        assert!(lane.warnings().is_empty());

        lane.edit(LaneEdit {
            distance: Some(Decimal::ZERO),
            ..LaneEdit::default()
        });
        assert_eq!(lane.margin(), dec!(-100.0));
        assert_eq!(lane.status(), LaneStatus::Error);
    }

    #[test]
    fn test_edit_clears_references() {
        let mut lane = Lane::from(new_lane());
        lane.edit(LaneEdit {
            historical_rate: Some(Some(dec!(2.40))),
            ..LaneEdit::default()
        });
        assert_eq!(lane.benchmark(), Some(dec!(2.10)));
        assert_eq!(lane.historical_rate(), Some(dec!(2.40)));

        let edit: LaneEdit = serde_json::from_value(serde_json::json!({ "benchmark": null })).unwrap();
        assert_eq!(edit.benchmark, Some(None));
        assert_eq!(edit.historical_rate, None);

        lane.edit(edit);
        assert_eq!(lane.benchmark(), None);
        assert_eq!(lane.historical_rate(), Some(dec!(2.40)));
    }

    #[test]
    fn test_failed_edit_leaves_lane_consistent() {
        let mut lane = Lane::from(new_lane());
        let before = lane.clone();

        // 1e18 * 1e15 desborda Decimal dentro del recálculo
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            lane.edit(LaneEdit {
                base_rate: Some(Decimal::from(1_000_000_000_000_000_000_i64)),
                distance: Some(Decimal::from(1_000_000_000_000_000_i64)),
                ..LaneEdit::default()
            });
        }));

        assert!(result.is_err());
        assert_eq!(lane, before);
        assert_eq!(lane.margin(), cost_model::compute_margin(&lane.cost_inputs()).margin);
    }

    #[test]
    fn test_lane_edit_rejects_out_of_range_values() {
        let edit = LaneEdit {
            base_rate: Some(Decimal::from(1_000_000_000_000_000_000_i64)),
            distance: Some(Decimal::from(1_000_000_000_000_000_i64)),
            benchmark: Some(Some(dec!(-1))),
            ..LaneEdit::default()
        };

        let errors = edit.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("base_rate"));
        assert!(fields.contains_key("distance"));
        assert!(fields.contains_key("benchmark"));

        let clear = LaneEdit {
            benchmark: Some(None),
            ..LaneEdit::default()
        };
        assert!(clear.validate().is_ok());
    }

    #[test]
    fn test_apply_solution_matches_record() {
        let mut lane = Lane::from(new_lane());
        let solutions = pre_solve_rates(std::slice::from_ref(&lane), dec!(16.5), &SolveOptions::default());

        lane.apply_solution(&solutions[0]);

        assert_eq!(lane.base_rate(), solutions[0].new_rate);
        assert_eq!(lane.margin(), solutions[0].new_margin);
        assert_eq!(lane.status(), LaneStatus::Valid);
    }

    #[test]
    fn test_new_lane_validation() {
        assert!(new_lane().validate().is_ok());

        let mut invalid = new_lane();
        invalid.origin = "  ".to_string();
        invalid.base_rate = dec!(-1);
        invalid.volume = 0;

        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("origin"));
        assert!(fields.contains_key("base_rate"));
        assert!(fields.contains_key("volume"));
    }

    #[test]
    fn test_new_lane_deserialize_defaults() {
        let json = serde_json::json!({
            "id": "LANE-0009",
            "origin": "Dallas, TX",
            "destination": "Denver, CO",
            "distance": 780,
            "base_rate": "2.45",
            "fuel_surcharge": 0.42,
            "accessorials": 120
        });

        let request: NewLane = serde_json::from_value(json).unwrap();
        assert_eq!(request.equipment, "Dry Van");
        assert_eq!(request.volume, 1);
        assert_eq!(request.deadhead, 0);
        assert_eq!(request.benchmark, None);
        assert_eq!(request.fuel_surcharge, dec!(0.42));
    }
}
