use serde::{Deserialize, Serialize};

use super::venue::{Seat, SeatStatus};

/// Выбранное место: все поля места + секция, ряд и цена на момент выбора.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSeat {
    pub id: String,
    pub col: i32,
    pub x: f64,
    pub y: f64,
    pub price_tier: u32,
    pub status: SeatStatus,
    pub section_id: String,
    pub row_index: i32,
    pub price: u64,
}

impl SelectedSeat {
    pub fn new(seat: &Seat, section_id: &str, row_index: i32, price: u64) -> Self {
        Self {
            id: seat.id.clone(),
            col: seat.col,
            x: seat.x,
            y: seat.y,
            price_tier: seat.price_tier,
            status: seat.status,
            section_id: section_id.to_string(),
            row_index,
            price,
        }
    }

    /// Короткий код вида `A-12-05`.
    pub fn code(&self) -> String {
        format!("{}-{}-{:02}", self.section_id, self.row_index, self.col)
    }
}
