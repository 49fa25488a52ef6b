//! Services module
//!
//! Este módulo contiene la lógica de negocio del workbench. El motor de
//! pricing (modelo de costos, solver y detector de anomalías) son funciones
//! puras sin estado ni I/O; el resto de la aplicación solo las invoca.

pub mod anomaly_detector;
pub mod cost_model;
pub mod lane_generator;
pub mod rate_solver;
pub mod rfp_analytics;

pub use anomaly_detector::{check_lane, check_rate_too_high, RateCheck, ReferenceKind};
pub use cost_model::{classify_margin, compute_margin, cost_breakdown, CostBreakdown, CostInputs, MarginResult};
pub use rate_solver::{calculate_optimal_rate, pre_solve_rates, SolutionRecord, SolveOptions};
