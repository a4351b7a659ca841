use serde::{Deserialize, Serialize};

pub const ZOOM_STEP: f64 = 1.5;
pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Куда пришлось нажатие: на место или на фон карты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerTarget {
    Seat,
    Background,
}

/// То, что применяется к сцене: `scale(s) translate(tx, ty)`, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewportState {
    pub scale: f64,
    pub zoom_percent: i64,
    pub offset: Point,
    pub panning: bool,
    pub transform: ViewTransform,
}

/// Глобальные pan + zoom поверх всей сцены. Не зависит от
/// статического transform каждой секции.
#[derive(Debug, Clone)]
pub struct Viewport {
    scale: f64,
    offset: Point,
    // pointer − offset на момент начала перетаскивания
    pan_anchor: Option<Point>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point::ORIGIN,
            pan_anchor: None,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    pub fn zoom_in(&mut self) {
        self.scale = (self.scale * ZOOM_STEP).min(MAX_SCALE);
    }

    pub fn zoom_out(&mut self) {
        self.scale = (self.scale / ZOOM_STEP).max(MIN_SCALE);
    }

    pub fn reset(&mut self) {
        self.scale = 1.0;
        self.offset = Point::ORIGIN;
    }

    pub fn zoom_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    /// Начать перетаскивание мышью. С места перетаскивание не начинается.
    pub fn pointer_down(&mut self, pointer: Point, target: PointerTarget) -> bool {
        if target == PointerTarget::Seat {
            return false;
        }
        self.pan_anchor = Some(Point::new(pointer.x - self.offset.x, pointer.y - self.offset.y));
        true
    }

    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        match self.pan_anchor {
            Some(anchor) => {
                // Без ограничений: карту можно увести сколь угодно далеко
                self.offset = Point::new(pointer.x - anchor.x, pointer.y - anchor.y);
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.pan_anchor = None;
    }

    /// Касание панорамирует только одним пальцем.
    pub fn touch_start(&mut self, touches: &[Point], target: PointerTarget) -> bool {
        match touches {
            [touch] => self.pointer_down(*touch, target),
            _ => false,
        }
    }

    pub fn touch_move(&mut self, touches: &[Point]) -> bool {
        match touches {
            [touch] => self.pointer_move(*touch),
            _ => false,
        }
    }

    pub fn touch_end(&mut self) {
        self.pointer_up();
    }

    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            scale: self.scale,
            translate_x: self.offset.x / self.scale,
            translate_y: self.offset.y / self.scale,
        }
    }

    /// screen = map * scale + offset
    pub fn to_screen(&self, map: Point) -> Point {
        Point::new(map.x * self.scale + self.offset.x, map.y * self.scale + self.offset.y)
    }

    pub fn to_map(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            scale: self.scale,
            zoom_percent: self.zoom_percent(),
            offset: self.offset,
            panning: self.is_panning(),
            transform: self.transform(),
        }
    }
}
