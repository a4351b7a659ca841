//! Синтетическая большая площадка для нагрузочных проверок.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{MapSize, Row, Seat, SeatStatus, Section, SectionTransform, Venue};

const SECTIONS_PER_BAND: usize = 5;
const SECTION_WIDTH: f64 = 1100.0;
const SECTION_HEIGHT: f64 = 800.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSpec {
    pub sections: usize,
    pub rows: i32,
    pub cols: i32,
    pub seed: u64,
}

impl Default for GeneratorSpec {
    // 10 секций * 30 рядов * 50 мест = 15 000
    fn default() -> Self {
        Self {
            sections: 10,
            rows: 30,
            cols: 50,
            seed: 42,
        }
    }
}

/// Код секции: A..Z, затем AA, AB, ...
pub fn section_code(mut n: usize) -> String {
    let mut code = Vec::new();
    loop {
        code.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    code.reverse();
    String::from_utf8_lossy(&code).into_owned()
}

fn random_status(rng: &mut StdRng) -> SeatStatus {
    let value: f64 = rng.gen();
    if value < 0.7 {
        SeatStatus::Available
    } else if value < 0.85 {
        SeatStatus::Reserved
    } else if value < 0.95 {
        SeatStatus::Sold
    } else {
        SeatStatus::Held
    }
}

fn tier_for_row(row: i32) -> u32 {
    match row {
        r if r <= 10 => 1,
        r if r <= 20 => 2,
        _ => 3,
    }
}

pub fn generate(spec: &GeneratorSpec) -> Venue {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let mut sections = Vec::with_capacity(spec.sections);

    for i in 0..spec.sections {
        let code = section_code(i);
        let rows = (1..=spec.rows)
            .map(|row_index| Row {
                index: row_index,
                seats: (1..=spec.cols)
                    .map(|col| Seat {
                        id: format!("{}-{}-{:02}", code, row_index, col),
                        col,
                        x: 50.0 + f64::from(col - 1) * 20.0,
                        y: 80.0 + f64::from(row_index - 1) * 25.0,
                        price_tier: tier_for_row(row_index),
                        status: random_status(&mut rng),
                    })
                    .collect(),
            })
            .collect();

        sections.push(Section {
            id: code.clone(),
            label: format!("Section {}", code),
            transform: SectionTransform {
                x: (i % SECTIONS_PER_BAND) as f64 * SECTION_WIDTH,
                y: (i / SECTIONS_PER_BAND) as f64 * SECTION_HEIGHT,
                scale: 1.0,
            },
            rows,
        });
    }

    let bands = spec.sections.div_ceil(SECTIONS_PER_BAND).max(1);
    let total = spec.sections * spec.rows.max(0) as usize * spec.cols.max(0) as usize;

    Venue {
        venue_id: "large-arena-01".to_string(),
        name: format!("Large Test Arena ({}k seats)", total / 1000),
        map: MapSize {
            width: SECTIONS_PER_BAND as f64 * SECTION_WIDTH,
            height: bands as f64 * SECTION_HEIGHT,
        },
        sections,
    }
}
