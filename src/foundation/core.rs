/// Integer pixel position, origin top-left.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Point {
    /// Column in pixels.
    pub x: u32,
    /// Row in pixels.
    pub y: u32,
}

impl Point {
    /// The canvas origin.
    pub const ZERO: Point = Point { x: 0, y: 0 };

    /// Build a point.
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned pixel rectangle, `min` inclusive and `max` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Top-left corner (inclusive).
    pub min: Point,
    /// Bottom-right corner (exclusive).
    pub max: Point,
}

impl PixelRect {
    /// Build from corner coordinates. Corners are normalised so `min <= max`.
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// Build from origin and size, saturating at `u32::MAX`.
    pub fn from_origin_size(origin: Point, width: u32, height: u32) -> Self {
        Self {
            min: origin,
            max: Point::new(
                origin.x.saturating_add(width),
                origin.y.saturating_add(height),
            ),
        }
    }

    pub fn width(self) -> u32 {
        self.max.x - self.min.x
    }

    pub fn height(self) -> u32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// True when the two rectangles share at least one pixel. Touching edges do not count.
    pub fn intersects(self, other: PixelRect) -> bool {
        !self.intersection(other).is_empty()
    }

    /// Overlapping part of both rectangles (empty when they do not overlap).
    pub fn intersection(self, other: PixelRect) -> PixelRect {
        let x0 = self.min.x.max(other.min.x);
        let y0 = self.min.y.max(other.min.y);
        let x1 = self.max.x.min(other.max.x).max(x0);
        let y1 = self.max.y.min(other.max.y).max(y0);
        PixelRect {
            min: Point::new(x0, y0),
            max: Point::new(x1, y1),
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(self, other: PixelRect) -> PixelRect {
        PixelRect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// The same size moved so `min` is at the origin.
    pub fn at_origin(self) -> PixelRect {
        PixelRect::from_origin_size(Point::ZERO, self.width(), self.height())
    }

    /// Move by `offset`, saturating at `u32::MAX`.
    pub fn translate(self, offset: Point) -> PixelRect {
        PixelRect::from_origin_size(
            Point::new(
                self.min.x.saturating_add(offset.x),
                self.min.y.saturating_add(offset.y),
            ),
            self.width(),
            self.height(),
        )
    }

    /// Express this rectangle relative to `origin`. `origin` must not be past `min`.
    pub fn relative_to(self, origin: Point) -> PixelRect {
        PixelRect {
            min: Point::new(self.min.x - origin.x, self.min.y - origin.y),
            max: Point::new(self.max.x - origin.x, self.max.y - origin.y),
        }
    }
}

/// Grid rows and columns of a canvas. Zero is treated as one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GridDimensions {
    pub rows: u32,
    pub cols: u32,
}

impl GridDimensions {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Cell size for a canvas, integer truncated.
    pub fn cell_size(self, width: u32, height: u32) -> (u32, u32) {
        (width / self.cols, height / self.rows)
    }
}

impl Default for GridDimensions {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
