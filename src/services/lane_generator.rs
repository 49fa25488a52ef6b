//! Generador de lanes demo
//!
//! Produce lanes aleatorios pero plausibles para sembrar RFPs de prueba.
//! Los valores monetarios se generan como enteros en centavos para que los
//! decimales salgan exactos a 2 dígitos; margen, estado y warnings los
//! calcula el modelo de costos como en cualquier otro lane.

use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

use crate::models::lane::{Lane, NewLane};

const ORIGINS: [&str; 6] = [
    "Chicago, IL",
    "Atlanta, GA",
    "Los Angeles, CA",
    "Dallas, TX",
    "New York, NY",
    "Phoenix, AZ",
];

const DESTINATIONS: [&str; 6] = [
    "Miami, FL",
    "Seattle, WA",
    "Boston, MA",
    "Denver, CO",
    "Philadelphia, PA",
    "Houston, TX",
];

const EQUIPMENT: [&str; 3] = ["Dry Van", "Reefer", "Flatbed"];

/// Monto aleatorio en `[min_cents, max_cents)` con 2 decimales
fn cents<R: Rng>(rng: &mut R, min_cents: i64, max_cents: i64) -> Decimal {
    Decimal::new(rng.gen_range(min_cents..max_cents), 2)
}

fn pick<R: Rng>(rng: &mut R, values: &[&'static str]) -> String {
    values.choose(rng).copied().unwrap_or_default().to_string()
}

/// Id de lane con formato `LANE-0001`
pub fn lane_id(index: usize) -> String {
    format!("LANE-{:04}", index + 1)
}

/// Generar `count` lanes demo
pub fn generate_lanes<R: Rng>(count: usize, rng: &mut R) -> Vec<Lane> {
    generate_lanes_from(0, count, rng)
}

/// Generar `count` lanes demo numerados a partir de `start_index`
pub fn generate_lanes_from<R: Rng>(start_index: usize, count: usize, rng: &mut R) -> Vec<Lane> {
    let lanes: Vec<Lane> = (start_index..start_index + count)
        .map(|i| {
            let historical_rate = rng.gen_bool(0.5).then(|| cents(rng, 130, 360));

            Lane::from(NewLane {
                id: lane_id(i),
                origin: pick(rng, &ORIGINS),
                destination: pick(rng, &DESTINATIONS),
                equipment: pick(rng, &EQUIPMENT),
                volume: rng.gen_range(1..=50),
                distance: Decimal::from(rng.gen_range(100u32..1600)),
                base_rate: cents(rng, 150, 350),
                fuel_surcharge: cents(rng, 20, 70),
                accessorials: cents(rng, 5_000, 25_000),
                deadhead: rng.gen_range(0..100),
                benchmark: Some(cents(rng, 120, 370)),
                historical_rate,
            })
        })
        .collect();

    log::info!("🎲 {} lanes demo generados", lanes.len());
    lanes
}
