use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::{Seat, SeatStatus, SelectedSeat};
use crate::pricing::PricingTable;
use crate::storage::KeyValueStore;

pub const MAX_SELECTED_SEATS: usize = 8;
pub const STORAGE_KEY: &str = "selected-seats";

/// Результат переключения места.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Selected,
    Deselected,
    /// Место не в статусе available, ничего не изменилось.
    Unavailable,
    /// Достигнут лимит, ничего не изменилось.
    LimitReached,
}

impl ToggleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ToggleOutcome::Selected | ToggleOutcome::Deselected)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryLine {
    pub seat_id: String,
    pub code: String,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionSummary {
    pub count: usize,
    pub max_seats: usize,
    pub remaining: usize,
    pub seats: Vec<SummaryLine>,
    pub total_price: u64,
}

/// Упорядоченный список выбранных мест с лимитом.
/// Каждая мутация целиком пишется в хранилище под одним ключом.
pub struct SelectionStore {
    seats: Vec<SelectedSeat>,
    max_seats: usize,
    key: String,
    storage: Arc<dyn KeyValueStore>,
}

impl SelectionStore {
    /// Восстанавливает выбор из хранилища. Ошибка разбора, повтор id или
    /// место не в статусе available дают пустой выбор.
    pub fn load(storage: Arc<dyn KeyValueStore>, key: &str, max_seats: usize) -> Self {
        let mut seats = match storage.get(key) {
            Some(raw) => match serde_json::from_str::<Vec<SelectedSeat>>(&raw) {
                Ok(seats) => match check_restored(&seats) {
                    Ok(()) => seats,
                    Err(problem) => {
                        warn!(
                            "Stored selection under '{}' is inconsistent ({}), starting empty",
                            key, problem
                        );
                        Vec::new()
                    }
                },
                Err(e) => {
                    warn!("Stored selection under '{}' is unreadable, starting empty: {}", key, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if seats.len() > max_seats {
            warn!(
                "Stored selection has {} seats, keeping first {}",
                seats.len(),
                max_seats
            );
            seats.truncate(max_seats);
        }

        info!("Selection restored: {} seats", seats.len());
        Self {
            seats,
            max_seats,
            key: key.to_string(),
            storage,
        }
    }

    pub fn toggle(
        &mut self,
        seat: &Seat,
        section_id: &str,
        row_index: i32,
        pricing: &PricingTable,
    ) -> ToggleOutcome {
        if !seat.is_available() {
            return ToggleOutcome::Unavailable;
        }

        if let Some(pos) = self.seats.iter().position(|s| s.id == seat.id) {
            self.seats.remove(pos);
            self.persist();
            debug!("Seat {} deselected", seat.id);
            return ToggleOutcome::Deselected;
        }

        if !self.can_select_more() {
            debug!("Seat {} rejected, limit of {} reached", seat.id, self.max_seats);
            return ToggleOutcome::LimitReached;
        }

        let price = pricing.price_for(seat.price_tier);
        self.seats
            .push(SelectedSeat::new(seat, section_id, row_index, price));
        self.persist();
        debug!("Seat {} selected for {}", seat.id, price);
        ToggleOutcome::Selected
    }

    pub fn clear(&mut self) {
        self.seats.clear();
        self.persist();
    }

    pub fn is_selected(&self, seat_id: &str) -> bool {
        self.seats.iter().any(|s| s.id == seat_id)
    }

    pub fn total_price(&self) -> u64 {
        self.seats.iter().map(|s| s.price).sum()
    }

    pub fn seats(&self) -> &[SelectedSeat] {
        &self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn max_seats(&self) -> usize {
        self.max_seats
    }

    pub fn can_select_more(&self) -> bool {
        self.seats.len() < self.max_seats
    }

    pub fn remaining(&self) -> usize {
        self.max_seats.saturating_sub(self.seats.len())
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            count: self.len(),
            max_seats: self.max_seats,
            remaining: self.remaining(),
            seats: self
                .seats
                .iter()
                .map(|s| SummaryLine {
                    seat_id: s.id.clone(),
                    code: s.code(),
                    price: s.price,
                })
                .collect(),
            total_price: self.total_price(),
        }
    }

    fn persist(&self) {
        match serde_json::to_string(&self.seats) {
            Ok(data) => self.storage.set(&self.key, data),
            Err(e) => warn!("Failed to serialize selection: {}", e),
        }
    }
}

// Сохранённый список должен удовлетворять тем же инвариантам, что и живой
fn check_restored(seats: &[SelectedSeat]) -> Result<(), String> {
    let mut seen = HashSet::with_capacity(seats.len());
    for seat in seats {
        if !seen.insert(seat.id.as_str()) {
            return Err(format!("seat {} listed twice", seat.id));
        }
        if seat.status != SeatStatus::Available {
            return Err(format!("seat {} is {}", seat.id, seat.status.as_str()));
        }
    }
    Ok(())
}
