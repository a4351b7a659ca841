use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Seat, SeatIndex, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Поиск следующего места для фокуса. Рассматриваются только места
/// со статусом available. Если цели нет, возвращается `None`,
/// и вызывающий оставляет фокус как есть.
pub struct NavigationEngine<'a> {
    venue: &'a Venue,
    index: &'a SeatIndex,
}

impl<'a> NavigationEngine<'a> {
    pub fn new(venue: &'a Venue, index: &'a SeatIndex) -> Self {
        Self { venue, index }
    }

    /// Полный шаг навигации: без фокуса первое доступное место,
    /// с фокусом сосед в направлении `direction`.
    pub fn navigate(&self, focused: Option<&str>, direction: Direction) -> Option<&'a Seat> {
        match focused {
            None => self.first_available(),
            Some(seat_id) => self.next(seat_id, direction),
        }
    }

    pub fn first_available(&self) -> Option<&'a Seat> {
        self.venue.first_available().map(|r| r.seat)
    }

    pub fn next(&self, seat_id: &str, direction: Direction) -> Option<&'a Seat> {
        let current = self.index.resolve(self.venue, seat_id)?;
        let col = current.seat.col;

        let target = match direction {
            // Только соседняя колонка в том же ряду, без перескока через дыры
            Direction::Left => current.row.available_in_col(col.checked_sub(1)?),
            Direction::Right => current.row.available_in_col(col.checked_add(1)?),
            Direction::Up | Direction::Down => {
                let row_index = if direction == Direction::Up {
                    current.row.index.checked_sub(1)?
                } else {
                    current.row.index.checked_add(1)?
                };
                let row = current.section.row(row_index)?;
                // Сначала та же колонка, потом первое доступное по порядку хранения
                row.available_in_col(col).or_else(|| row.first_available())
            }
        };

        debug!(
            "Navigate {:?} from {} -> {:?}",
            direction,
            seat_id,
            target.map(|s| s.id.as_str())
        );
        target
    }
}
