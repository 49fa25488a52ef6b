use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use rfp_pricing::models::lane::{Lane, LaneStatus, NewLane};
use rfp_pricing::services::anomaly_detector::{check_rate_too_high, ReferenceKind};
use rfp_pricing::services::cost_model::{self, classify_margin, compute_margin, CostInputs};
use rfp_pricing::services::lane_generator::generate_lanes;
use rfp_pricing::services::rate_solver::{calculate_optimal_rate, pre_solve_rates, SolveOptions};

fn sample_inputs() -> CostInputs {
    CostInputs {
        base_rate: dec!(2.00),
        distance: dec!(500),
        fuel_surcharge: dec!(0.30),
        accessorials: dec!(100),
        deadhead: 50,
    }
}

fn lane_with(id: &str, base_rate: Decimal, benchmark: Option<Decimal>) -> Lane {
    Lane::from(NewLane {
        id: id.to_string(),
        origin: "Dallas, TX".to_string(),
        destination: "Denver, CO".to_string(),
        equipment: "Reefer".to_string(),
        volume: 4,
        distance: dec!(500),
        base_rate,
        fuel_surcharge: dec!(0.30),
        accessorials: dec!(100),
        deadhead: 50,
        benchmark,
        historical_rate: None,
    })
}

#[test]
fn test_sample_lane_end_to_end() {
    let lane = lane_with("LANE-0001", dec!(2.00), None);
    assert_eq!(lane.margin(), dec!(-7.0));
    assert_eq!(lane.status(), LaneStatus::Error);
    assert_eq!(lane.warnings().to_vec(), vec!["Margin below threshold".to_string()]);

    let solutions = pre_solve_rates(&[lane], dec!(12), &SolveOptions::default());
    assert_eq!(solutions[0].new_rate.to_string(), "4.55");
    assert_eq!(solutions[0].new_margin.to_string(), "12.0");
    assert!(!solutions[0].rate_too_high);
}

#[test]
fn test_solver_round_trip_over_generated_lanes() {
    let mut rng = StdRng::seed_from_u64(2024);
    let lanes = generate_lanes(100, &mut rng);
    let targets = [dec!(0), dec!(5), dec!(8), dec!(10.5), dec!(12), dec!(16.5), dec!(25), dec!(33)];

    for lane in &lanes {
        let inputs = lane.cost_inputs();
        for target in targets {
            let rate = calculate_optimal_rate(&inputs, target);
            let achieved = compute_margin(&inputs.with_base_rate(rate)).margin;
            assert!(
                (achieved - target).abs() <= dec!(0.1),
                "lane {} target {} achieved {}",
                lane.id(),
                target,
                achieved
            );
        }
    }
}

#[test]
fn test_solver_unreachable_margins_keep_rate() {
    let inputs = sample_inputs();
    for target in [dec!(33.34), dec!(40), dec!(100)] {
        assert_eq!(calculate_optimal_rate(&inputs, target), inputs.base_rate);
    }
}

#[test]
fn test_solver_zero_distance_keeps_rate() {
    let inputs = CostInputs {
        distance: Decimal::ZERO,
        ..sample_inputs()
    };
    assert_eq!(calculate_optimal_rate(&inputs, dec!(12)), dec!(2.00));
}

#[test]
fn test_margin_monotonic_for_generated_lanes() {
    let mut rng = StdRng::seed_from_u64(99);

    for lane in generate_lanes(20, &mut rng) {
        let inputs = lane.cost_inputs();
        let mut previous = compute_margin(&inputs.with_base_rate(Decimal::ZERO)).margin;
        let mut rate = Decimal::ZERO;
        while rate < dec!(6) {
            rate += dec!(0.25);
            let margin = compute_margin(&inputs.with_base_rate(rate)).margin;
            assert!(margin >= previous, "lane {} at rate {}", lane.id(), rate);
            previous = margin;
        }
    }
}

#[test]
fn test_classification_bands() {
    let cases = [
        (dec!(-50), LaneStatus::Error),
        (dec!(7.9), LaneStatus::Error),
        (dec!(8.0), LaneStatus::Warning),
        (dec!(11.9), LaneStatus::Warning),
        (dec!(12.0), LaneStatus::Valid),
        (dec!(45), LaneStatus::Valid),
    ];

    for (margin, expected) in cases {
        let classification = classify_margin(margin);
        assert_eq!(classification.status, expected, "margin {}", margin);
        assert_eq!(
            classification.warnings.is_empty(),
            expected != LaneStatus::Error,
            "margin {}",
            margin
        );
    }
}

#[test]
fn test_margin_is_rounded_to_one_decimal() {
    let mut rng = StdRng::seed_from_u64(5);
    for lane in generate_lanes(30, &mut rng) {
        assert_eq!(lane.margin(), cost_model::round_margin(lane.margin()));
        assert_eq!(lane.margin().scale(), 1);
    }
}

#[test]
fn test_anomaly_precedence_and_threshold() {
    let flagged = check_rate_too_high(dec!(3.00), Some(dec!(2.40)), Some(dec!(2.00)), dec!(20));
    assert!(flagged.is_too_high);
    assert_eq!(flagged.compared_to, Some(ReferenceKind::Benchmark));
    assert_eq!(flagged.reason.as_deref(), Some("Rate is 25.0% above market benchmark"));

    let none = check_rate_too_high(dec!(3.00), None, None, dec!(20));
    assert!(!none.is_too_high);
    assert!(none.reason.is_none());
}

#[test]
fn test_pre_solve_flags_against_benchmark() {
    // 4.55 queda 30% sobre 3.50
    let lanes = vec![
        lane_with("LANE-0001", dec!(2.00), Some(dec!(3.50))),
        lane_with("LANE-0002", dec!(2.00), Some(dec!(4.50))),
    ];
    let solutions = pre_solve_rates(&lanes, dec!(12), &SolveOptions::default());

    assert_eq!(solutions[0].lane_id, "LANE-0001");
    assert!(solutions[0].rate_too_high);
    assert_eq!(
        solutions[0].rate_warning.as_deref(),
        Some("Rate is 30.0% above market benchmark")
    );
    assert_eq!(solutions[1].lane_id, "LANE-0002");
    assert!(!solutions[1].rate_too_high);
}

#[test]
fn test_pre_solve_respects_rate_ceiling() {
    let lanes = vec![lane_with("LANE-0001", dec!(2.00), None)];
    let options = SolveOptions {
        max_rate: Some(dec!(3.00)),
        ..SolveOptions::default()
    };
    let solutions = pre_solve_rates(&lanes, dec!(12), &options);

    assert_eq!(solutions[0].new_rate, dec!(3.00));
    assert!(solutions[0].new_margin < dec!(12));
}

#[test]
fn test_solver_targets_at_the_ceiling_keep_rate() {
    let inputs = sample_inputs();
    for target in [
        dec!(33.3333333333),
        dec!(33.333333333333333333333333),
        Decimal::MAX,
        Decimal::MIN,
    ] {
        assert_eq!(calculate_optimal_rate(&inputs, target), dec!(2.00), "target {}", target);
    }
}

#[test]
fn test_pre_solve_near_ceiling_keeps_lanes_in_order() {
    let lanes = vec![
        lane_with("LANE-0001", dec!(2.00), Some(dec!(3.50))),
        lane_with("LANE-0002", dec!(2.50), None),
    ];
    let solutions = pre_solve_rates(&lanes, dec!(33.333333333333333333333333), &SolveOptions::default());

    assert_eq!(solutions.len(), 2);
    assert_eq!(solutions[0].lane_id, "LANE-0001");
    assert_eq!(solutions[0].new_rate, dec!(2.00));
    assert_eq!(solutions[0].new_margin, dec!(-7.0));
    assert_eq!(solutions[1].new_rate, dec!(2.50));
}

#[test]
fn test_solver_large_lane_stays_exact() {
    // Costos de 2e9 por lane: la tarifa resuelta queda en ~14000 por milla
    let inputs = CostInputs {
        base_rate: Decimal::ONE,
        distance: Decimal::from(1_000_000),
        fuel_surcharge: Decimal::from(1_000),
        accessorials: Decimal::from(1_000_000_000),
        deadhead: 50,
    };
    assert!(compute_margin(&inputs).margin < Decimal::ZERO);

    let rate = calculate_optimal_rate(&inputs, dec!(12));
    assert!(rate > dec!(14000) && rate < dec!(14001), "rate {}", rate);
    let achieved = compute_margin(&inputs.with_base_rate(rate)).margin;
    assert_eq!(achieved, dec!(12.0));
}

#[test]
fn test_solver_result_above_rate_cap_keeps_rate() {
    let inputs = CostInputs {
        distance: Decimal::ONE,
        accessorials: Decimal::from(1_000_000_000),
        ..sample_inputs()
    };
    assert_eq!(calculate_optimal_rate(&inputs, dec!(12)), dec!(2.00));
}
