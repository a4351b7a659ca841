use serde::Serialize;

use crate::models::{SeatStatus, Venue};
use super::viewport::Point;

/// Жёсткий потолок на число отрисовываемых мест.
pub const MAX_RENDERED_SEATS: usize = 20_000;
pub const SEAT_RADIUS: f64 = 8.0;

#[derive(Debug, Clone, Serialize)]
pub struct RenderedSeat {
    pub seat_id: String,
    pub section_id: String,
    pub row_index: i32,
    pub status: SeatStatus,
    /// Абсолютная позиция на карте с учётом transform секции.
    pub cx: f64,
    pub cy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionLabel {
    pub section_id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// Набор мест, которые реально попадают на сцену.
/// Места сверх лимита есть в данных, но не рисуются и недоступны для клика.
#[derive(Debug, Clone, Default)]
pub struct RenderPlan {
    seats: Vec<RenderedSeat>,
    labels: Vec<SectionLabel>,
    omitted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderStats {
    pub rendered: usize,
    pub omitted: usize,
    pub cap: usize,
}

impl RenderPlan {
    pub fn build(venue: &Venue, cap: usize) -> Self {
        let total = venue.seat_count();
        let seats: Vec<RenderedSeat> = venue
            .seats()
            .take(cap)
            .map(|r| {
                let t = r.section.transform;
                RenderedSeat {
                    seat_id: r.seat.id.clone(),
                    section_id: r.section.id.clone(),
                    row_index: r.row.index,
                    status: r.seat.status,
                    cx: r.seat.x * t.scale + t.x,
                    cy: r.seat.y * t.scale + t.y,
                }
            })
            .collect();

        let labels = venue
            .sections
            .iter()
            .map(|s| SectionLabel {
                section_id: s.id.clone(),
                label: s.label.clone(),
                x: s.transform.x + 100.0,
                y: s.transform.y + 65.0,
            })
            .collect();

        let omitted = total - seats.len();
        Self { seats, labels, omitted }
    }

    pub fn seats(&self) -> &[RenderedSeat] {
        &self.seats
    }

    pub fn labels(&self) -> &[SectionLabel] {
        &self.labels
    }

    pub fn rendered(&self) -> usize {
        self.seats.len()
    }

    pub fn omitted(&self) -> usize {
        self.omitted
    }

    pub fn stats(&self, cap: usize) -> RenderStats {
        RenderStats {
            rendered: self.rendered(),
            omitted: self.omitted,
            cap,
        }
    }

    /// Верхнее (последнее нарисованное) место под точкой карты.
    pub fn hit_test(&self, map: Point) -> Option<&RenderedSeat> {
        let r2 = SEAT_RADIUS * SEAT_RADIUS;
        self.seats.iter().rev().find(|s| {
            let dx = s.cx - map.x;
            let dy = s.cy - map.y;
            dx * dx + dy * dy <= r2
        })
    }
}
