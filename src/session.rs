//! Состояние одной интерактивной сессии: площадка, фокус, выбор, вьюпорт.
//!
//! Все операции синхронные и короткие. Пока площадка не загружена,
//! интерактивные операции инертны и возвращают `VenueLoading` / `VenueLoadFailed`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AppError;
use crate::models::{SeatIndex, SeatStatus, Venue};
use crate::pricing::PricingTable;
use crate::services::render::{RenderPlan, RenderStats};
use crate::services::selection::SelectionSummary;
use crate::services::viewport::ViewportState;
use crate::services::{
    KeyCommand, NavigationEngine, Point, PointerTarget, SelectionStore, ToggleOutcome, VenueError,
    Viewport,
};

pub struct LoadedVenue {
    pub venue: Arc<Venue>,
    pub index: SeatIndex,
    pub render: RenderPlan,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedVenue {
    pub fn new(venue: Venue, render_cap: usize) -> Self {
        let index = SeatIndex::build(&venue);
        let render = RenderPlan::build(&venue, render_cap);
        if render.omitted() > 0 {
            warn!(
                "Venue has {} seats, only {} will be rendered",
                venue.seat_count(),
                render.rendered()
            );
        }
        Self {
            venue: Arc::new(venue),
            index,
            render,
            loaded_at: Utc::now(),
        }
    }
}

pub enum VenueState {
    Loading,
    Ready(LoadedVenue),
    Failed(String),
}

fn ready(state: &VenueState) -> Result<&LoadedVenue, AppError> {
    match state {
        VenueState::Ready(loaded) => Ok(loaded),
        VenueState::Loading => Err(AppError::VenueLoading),
        VenueState::Failed(message) => Err(AppError::VenueLoadFailed(message.clone())),
    }
}

#[derive(Debug, Serialize)]
pub struct VenueStatus {
    pub state: &'static str,
    pub venue_id: Option<String>,
    pub name: Option<String>,
    pub seats: Option<usize>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KeyOutcome {
    pub handled: bool,
    pub focus: Option<String>,
    pub toggle: Option<ToggleOutcome>,
}

#[derive(Debug, Serialize)]
pub struct ClickOutcome {
    pub seat_id: Option<String>,
    pub toggle: Option<ToggleOutcome>,
}

#[derive(Debug, Serialize)]
pub struct SeatDetails {
    pub seat_id: String,
    pub section_id: String,
    pub section_label: String,
    pub row_index: i32,
    pub col: i32,
    pub status: SeatStatus,
    pub tier_label: String,
    pub price: u64,
    pub selected: bool,
}

pub struct Session {
    venue: VenueState,
    focus: Option<String>,
    selection: SelectionStore,
    viewport: Viewport,
    pricing: PricingTable,
    render_cap: usize,
}

impl Session {
    pub fn new(selection: SelectionStore, pricing: PricingTable, render_cap: usize) -> Self {
        Self {
            venue: VenueState::Loading,
            focus: None,
            selection,
            viewport: Viewport::new(),
            pricing,
            render_cap,
        }
    }

    // === Загрузка площадки ===

    /// Переводит сессию в Loading. Повторная загрузка во время загрузки ничего не делает.
    pub fn begin_load(&mut self) -> bool {
        if matches!(self.venue, VenueState::Loading) {
            return false;
        }
        self.venue = VenueState::Loading;
        self.focus = None;
        true
    }

    pub fn finish_load(&mut self, result: Result<Venue, VenueError>) {
        // Новая ссылка на площадку = сброс фокуса
        self.focus = None;
        self.venue = match result {
            Ok(venue) => {
                let loaded = LoadedVenue::new(venue, self.render_cap);
                info!(
                    "Venue '{}' ready, {} seats rendered",
                    loaded.venue.name,
                    loaded.render.rendered()
                );
                VenueState::Ready(loaded)
            }
            Err(e) => {
                warn!("Venue load failed: {}", e);
                VenueState::Failed(e.to_string())
            }
        };
    }

    pub fn install_venue(&mut self, venue: Venue) {
        self.finish_load(Ok(venue));
    }

    pub fn loaded(&self) -> Result<&LoadedVenue, AppError> {
        ready(&self.venue)
    }

    pub fn status(&self) -> VenueStatus {
        match &self.venue {
            VenueState::Loading => VenueStatus {
                state: "loading",
                venue_id: None,
                name: None,
                seats: None,
                loaded_at: None,
                error: None,
            },
            VenueState::Ready(loaded) => VenueStatus {
                state: "ready",
                venue_id: Some(loaded.venue.venue_id.clone()),
                name: Some(loaded.venue.name.clone()),
                seats: Some(loaded.venue.seat_count()),
                loaded_at: Some(loaded.loaded_at),
                error: None,
            },
            VenueState::Failed(message) => VenueStatus {
                state: "failed",
                venue_id: None,
                name: None,
                seats: None,
                loaded_at: None,
                error: Some(message.clone()),
            },
        }
    }

    // === Фокус и клавиатура ===

    pub fn focused(&self) -> Option<&str> {
        self.focus.as_deref()
    }

    pub fn focus_seat(&mut self, seat_id: &str) -> Result<(), AppError> {
        let loaded = ready(&self.venue)?;
        if loaded.index.position(seat_id).is_none() {
            return Err(AppError::SeatNotFound(seat_id.to_string()));
        }
        self.focus = Some(seat_id.to_string());
        Ok(())
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    pub fn handle_key(&mut self, key: &str) -> Result<KeyOutcome, AppError> {
        ready(&self.venue)?;

        let command = match KeyCommand::from_key(key) {
            Some(command) => command,
            None => {
                return Ok(KeyOutcome {
                    handled: false,
                    focus: self.focus.clone(),
                    toggle: None,
                })
            }
        };

        let mut toggle = None;
        match command {
            KeyCommand::Move(direction) => {
                let loaded = ready(&self.venue)?;
                let engine = NavigationEngine::new(&loaded.venue, &loaded.index);
                if let Some(seat) = engine.navigate(self.focus.as_deref(), direction) {
                    self.focus = Some(seat.id.clone());
                }
            }
            KeyCommand::Activate => toggle = self.activate()?,
            KeyCommand::ClearFocus => self.focus = None,
        }

        Ok(KeyOutcome {
            handled: true,
            focus: self.focus.clone(),
            toggle,
        })
    }

    /// Enter/Space: место под фокусом заново ищется в площадке.
    /// Пропавшее или ставшее недоступным место молча игнорируется.
    pub fn activate(&mut self) -> Result<Option<ToggleOutcome>, AppError> {
        let loaded = ready(&self.venue)?;
        let Some(seat_id) = self.focus.as_deref() else {
            return Ok(None);
        };
        let Some(found) = loaded.index.resolve(&loaded.venue, seat_id) else {
            return Ok(None);
        };
        if !found.seat.is_available() {
            return Ok(None);
        }
        let outcome = self
            .selection
            .toggle(found.seat, &found.section.id, found.row.index, &self.pricing);
        Ok(Some(outcome))
    }

    // === Выбор ===

    pub fn toggle_seat(&mut self, seat_id: &str) -> Result<ToggleOutcome, AppError> {
        let loaded = ready(&self.venue)?;
        let found = loaded
            .index
            .resolve(&loaded.venue, seat_id)
            .ok_or_else(|| AppError::SeatNotFound(seat_id.to_string()))?;
        Ok(self
            .selection
            .toggle(found.seat, &found.section.id, found.row.index, &self.pricing))
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn summary(&self) -> SelectionSummary {
        self.selection.summary()
    }

    pub fn limit_notice(&self) -> String {
        format!("You can only select up to {} seats.", self.selection.max_seats())
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn seat_details(&self, seat_id: &str) -> Result<SeatDetails, AppError> {
        let loaded = ready(&self.venue)?;
        let found = loaded
            .index
            .resolve(&loaded.venue, seat_id)
            .ok_or_else(|| AppError::SeatNotFound(seat_id.to_string()))?;

        Ok(SeatDetails {
            seat_id: found.seat.id.clone(),
            section_id: found.section.id.clone(),
            section_label: found.section.label.clone(),
            row_index: found.row.index,
            col: found.seat.col,
            status: found.seat.status,
            tier_label: self.pricing.label_for(found.seat.price_tier).to_string(),
            price: self.pricing.price_for(found.seat.price_tier),
            selected: self.selection.is_selected(&found.seat.id),
        })
    }

    pub fn focused_details(&self) -> Option<SeatDetails> {
        let seat_id = self.focus.as_deref()?;
        self.seat_details(seat_id).ok()
    }

    // === Вьюпорт ===

    pub fn viewport(&self) -> Result<ViewportState, AppError> {
        ready(&self.venue)?;
        Ok(self.viewport.state())
    }

    pub fn zoom_in(&mut self) -> Result<ViewportState, AppError> {
        ready(&self.venue)?;
        self.viewport.zoom_in();
        Ok(self.viewport.state())
    }

    pub fn zoom_out(&mut self) -> Result<ViewportState, AppError> {
        ready(&self.venue)?;
        self.viewport.zoom_out();
        Ok(self.viewport.state())
    }

    pub fn reset_view(&mut self) -> Result<ViewportState, AppError> {
        ready(&self.venue)?;
        self.viewport.reset();
        Ok(self.viewport.state())
    }

    fn target_at(loaded: &LoadedVenue, viewport: &Viewport, screen: Point) -> PointerTarget {
        match loaded.render.hit_test(viewport.to_map(screen)) {
            Some(_) => PointerTarget::Seat,
            None => PointerTarget::Background,
        }
    }

    pub fn pointer_down(&mut self, screen: Point) -> Result<ViewportState, AppError> {
        let loaded = ready(&self.venue)?;
        let target = Self::target_at(loaded, &self.viewport, screen);
        self.viewport.pointer_down(screen, target);
        Ok(self.viewport.state())
    }

    pub fn pointer_move(&mut self, screen: Point) -> Result<ViewportState, AppError> {
        ready(&self.venue)?;
        self.viewport.pointer_move(screen);
        Ok(self.viewport.state())
    }

    pub fn pointer_up(&mut self) -> Result<ViewportState, AppError> {
        ready(&self.venue)?;
        self.viewport.pointer_up();
        Ok(self.viewport.state())
    }

    pub fn touch_start(&mut self, touches: &[Point]) -> Result<ViewportState, AppError> {
        let loaded = ready(&self.venue)?;
        let target = match touches {
            [touch] => Self::target_at(loaded, &self.viewport, *touch),
            _ => PointerTarget::Background,
        };
        self.viewport.touch_start(touches, target);
        Ok(self.viewport.state())
    }

    pub fn touch_move(&mut self, touches: &[Point]) -> Result<ViewportState, AppError> {
        ready(&self.venue)?;
        self.viewport.touch_move(touches);
        Ok(self.viewport.state())
    }

    pub fn touch_end(&mut self) -> Result<ViewportState, AppError> {
        ready(&self.venue)?;
        self.viewport.touch_end();
        Ok(self.viewport.state())
    }

    /// Клик по карте в экранных координатах. Кликабельны только
    /// отрисованные места; выбрать можно только available.
    pub fn click(&mut self, screen: Point) -> Result<ClickOutcome, AppError> {
        let loaded = ready(&self.venue)?;
        let hit = loaded.render.hit_test(self.viewport.to_map(screen));
        let Some(found) = hit.and_then(|h| loaded.index.resolve(&loaded.venue, &h.seat_id)) else {
            return Ok(ClickOutcome { seat_id: None, toggle: None });
        };

        // Фокус получает любое отрисованное место, переключается только доступное
        self.focus = Some(found.seat.id.clone());
        if !found.seat.is_available() {
            return Ok(ClickOutcome {
                seat_id: Some(found.seat.id.clone()),
                toggle: None,
            });
        }

        let outcome = self
            .selection
            .toggle(found.seat, &found.section.id, found.row.index, &self.pricing);
        Ok(ClickOutcome {
            seat_id: Some(found.seat.id.clone()),
            toggle: Some(outcome),
        })
    }

    pub fn render_stats(&self) -> Result<RenderStats, AppError> {
        let loaded = ready(&self.venue)?;
        Ok(loaded.render.stats(self.render_cap))
    }
}
