use serde::{Deserialize, Serialize};

/// A point in canvas coordinate space (origin at the top-left, y down).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn to_point(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }
}

impl From<Position> for kurbo::Point {
    fn from(p: Position) -> Self {
        p.to_point()
    }
}

/// Integer pixel dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Byte length of a flat RGBA8 buffer covering this size.
    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// An axis-aligned rectangle given as origin plus size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Top-left corner.
    pub position: Position,
    /// Extent in pixels.
    pub size: Size,
}

impl Region {
    pub fn new(position: Position, size: Size) -> Self {
        Self { position, size }
    }

    pub(crate) fn to_rect(self) -> kurbo::Rect {
        kurbo::Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + f64::from(self.size.width),
            self.position.y + f64::from(self.size.height),
        )
    }
}

pub(crate) fn rect_at(position: Position, size: Size) -> kurbo::Rect {
    Region::new(position, size).to_rect()
}
