use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Reserved,
    Sold,
    Held,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Available => "available",
            SeatStatus::Reserved => "reserved",
            SeatStatus::Sold => "sold",
            SeatStatus::Held => "held",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[validate(length(min = 1))]
    pub id: String,
    pub col: i32,
    pub x: f64,
    pub y: f64,
    #[validate(range(min = 1))]
    pub price_tier: u32,
    pub status: SeatStatus,
}

impl Seat {
    pub fn is_available(&self) -> bool {
        self.status == SeatStatus::Available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Row {
    pub index: i32,
    #[validate(nested)]
    pub seats: Vec<Seat>,
}

impl Row {
    // Колонки не обязаны идти подряд, поэтому только поиск
    pub fn available_in_col(&self, col: i32) -> Option<&Seat> {
        self.seats.iter().find(|s| s.col == col && s.is_available())
    }

    pub fn first_available(&self) -> Option<&Seat> {
        self.seats.iter().find(|s| s.is_available())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct SectionTransform {
    pub x: f64,
    pub y: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Section {
    #[validate(length(min = 1))]
    pub id: String,
    pub label: String,
    #[validate(nested)]
    pub transform: SectionTransform,
    #[validate(nested)]
    pub rows: Vec<Row>,
}

impl Section {
    pub fn row(&self, index: i32) -> Option<&Row> {
        self.rows.iter().find(|r| r.index == index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct MapSize {
    #[validate(range(exclusive_min = 0.0))]
    pub width: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub height: f64,
}

/// Статическое описание площадки: секции → ряды → места.
/// Загружается один раз и дальше только читается.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    #[validate(length(min = 1))]
    pub venue_id: String,
    pub name: String,
    #[validate(nested)]
    pub map: MapSize,
    #[validate(nested)]
    pub sections: Vec<Section>,
}

/// Место вместе с его секцией и рядом.
#[derive(Debug, Clone, Copy)]
pub struct SeatRef<'a> {
    pub section: &'a Section,
    pub row: &'a Row,
    pub seat: &'a Seat,
}

impl Venue {
    /// Все места в порядке обхода: секция, ряд, место.
    pub fn seats(&self) -> impl Iterator<Item = SeatRef<'_>> {
        self.sections.iter().flat_map(|section| {
            section.rows.iter().flat_map(move |row| {
                row.seats.iter().map(move |seat| SeatRef { section, row, seat })
            })
        })
    }

    pub fn seat_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter())
            .map(|r| r.seats.len())
            .sum()
    }

    pub fn first_available(&self) -> Option<SeatRef<'_>> {
        self.seats().find(|r| r.seat.is_available())
    }

    // Линейный поиск, для горячих путей есть SeatIndex
    pub fn find_seat(&self, seat_id: &str) -> Option<SeatRef<'_>> {
        self.seats().find(|r| r.seat.id == seat_id)
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// Первый повторяющийся id места, если есть.
    pub fn duplicate_seat_id(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::with_capacity(self.seat_count());
        self.seats()
            .map(|r| r.seat.id.as_str())
            .find(|id| !seen.insert(*id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatPosition {
    pub section: usize,
    pub row: usize,
    pub seat: usize,
}

/// Индекс id места → позиция в дереве. Строится один раз на загрузку площадки.
#[derive(Debug, Clone, Default)]
pub struct SeatIndex {
    positions: HashMap<String, SeatPosition>,
}

impl SeatIndex {
    pub fn build(venue: &Venue) -> Self {
        let mut positions = HashMap::with_capacity(venue.seat_count());
        for (si, section) in venue.sections.iter().enumerate() {
            for (ri, row) in section.rows.iter().enumerate() {
                for (pi, seat) in row.seats.iter().enumerate() {
                    positions
                        .entry(seat.id.clone())
                        .or_insert(SeatPosition { section: si, row: ri, seat: pi });
                }
            }
        }
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, seat_id: &str) -> Option<SeatPosition> {
        self.positions.get(seat_id).copied()
    }

    pub fn resolve<'a>(&self, venue: &'a Venue, seat_id: &str) -> Option<SeatRef<'a>> {
        let pos = self.position(seat_id)?;
        let section = venue.sections.get(pos.section)?;
        let row = section.rows.get(pos.row)?;
        let seat = row.seats.get(pos.seat)?;
        Some(SeatRef { section, row, seat })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn seat(id: &str, col: i32, status: SeatStatus) -> Seat {
        Seat {
            id: id.to_string(),
            col,
            x: f64::from(col) * 20.0,
            y: 0.0,
            price_tier: 1,
            status,
        }
    }

    pub fn row(index: i32, seats: Vec<Seat>) -> Row {
        Row { index, seats }
    }

    pub fn section(id: &str, rows: Vec<Row>) -> Section {
        Section {
            id: id.to_string(),
            label: format!("Section {}", id),
            transform: SectionTransform { x: 0.0, y: 0.0, scale: 1.0 },
            rows,
        }
    }

    pub fn venue(sections: Vec<Section>) -> Venue {
        Venue {
            venue_id: "test-venue".to_string(),
            name: "Test Venue".to_string(),
            map: MapSize { width: 1000.0, height: 800.0 },
            sections,
        }
    }
}
