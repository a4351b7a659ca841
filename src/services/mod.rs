pub mod generator;
pub mod keyboard;
pub mod navigation;
pub mod render;
pub mod selection;
pub mod venue_loader;
pub mod viewport;

pub use keyboard::KeyCommand;
pub use navigation::{Direction, NavigationEngine};
pub use render::RenderPlan;
pub use selection::{SelectionStore, ToggleOutcome};
pub use venue_loader::{VenueError, VenueLoader, VenueSource};
pub use viewport::{Point, PointerTarget, Viewport};
