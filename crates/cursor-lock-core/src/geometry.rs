/// Minimum width and height, in pixels, a rectangle must exceed to be clamped.
pub const MIN_DIM: i32 = 10;

/// Screen-space rectangle in the OS's window coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Right edge (exclusive).
    pub right: i32,
    /// Bottom edge (exclusive).
    pub bottom: i32,
}

impl Rect {
    /// Create a rectangle from its four edges.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Horizontal extent. Negative for inverted rectangles.
    pub const fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    /// Vertical extent. Negative for inverted rectangles.
    pub const fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Whether the cursor may be confined to this rectangle.
    ///
    /// Minimized and hidden windows report tiny or inverted rectangles,
    /// both of which are rejected.
    pub const fn is_clampable(&self) -> bool {
        self.width() > MIN_DIM && self.height() > MIN_DIM
    }
}
