pub mod venue;
pub mod selection;

pub use venue::{
    MapSize, Row, Seat, SeatIndex, SeatRef, SeatStatus, Section, SectionTransform, Venue,
};
pub use selection::SelectedSeat;
