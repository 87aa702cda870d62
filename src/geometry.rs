//! Page-space rectangles.
//!
//! PDF rectangles are four numbers `[x0 y0 x1 y1]` with the origin at the
//! bottom-left of the page. [`Rect`] normalizes that into position plus
//! extent, which is what layout math wants.

/// A rectangle in page space: bottom-left corner plus width and height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from position and extent.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle from two corner points, in either order.
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Left edge.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.y
    }

    /// Top edge.
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}
