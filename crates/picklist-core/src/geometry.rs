#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! [`Rect`] is a frame in the host's scroll-content coordinates (points,
//! origin at top-left). [`RowGeometry`] converts between row indices, pixel
//! offsets, and content extents for a uniform-height list.

/// A frame reported by the host: a row's bounds or the viewport's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width in points.
    pub width: f64,
    /// Height in points.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge.
    #[inline]
    pub const fn min_y(&self) -> f64 {
        self.y
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Whether the vertical extents overlap with a non-zero span.
    ///
    /// Rows sitting exactly on the viewport's top or bottom edge do not count.
    #[inline]
    pub fn intersects_vertically(&self, other: &Rect) -> bool {
        self.max_y() > other.min_y() && self.min_y() < other.max_y()
    }
}

/// Row arithmetic for a uniform-height list with inter-row spacing and
/// symmetric vertical padding.
///
/// Construction normalizes inputs so every method is total: the row height
/// is floored to 1, spacing and padding to 0, and non-finite values take the
/// floor. The row step is therefore always at least 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    row_height: f64,
    row_spacing: f64,
    vertical_padding: f64,
}

impl RowGeometry {
    /// Create normalized row geometry.
    #[must_use]
    pub fn new(row_height: f64, row_spacing: f64, vertical_padding: f64) -> Self {
        Self {
            row_height: floor_finite(row_height, 1.0),
            row_spacing: floor_finite(row_spacing, 0.0),
            vertical_padding: floor_finite(vertical_padding, 0.0),
        }
    }

    /// Row height in points (at least 1).
    #[inline]
    pub fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Spacing between consecutive rows.
    #[inline]
    pub fn row_spacing(&self) -> f64 {
        self.row_spacing
    }

    /// Padding above the first row and below the last.
    #[inline]
    pub fn vertical_padding(&self) -> f64 {
        self.vertical_padding
    }

    /// Distance between consecutive row origins.
    #[inline]
    pub fn row_step(&self) -> f64 {
        (self.row_height + self.row_spacing).max(1.0)
    }

    /// Top of row `index` in content coordinates.
    #[inline]
    pub fn row_top(&self, index: usize) -> f64 {
        self.vertical_padding + index as f64 * self.row_step()
    }

    /// Frame of row `index` spanning `width` points.
    pub fn row_frame(&self, index: usize, width: f64) -> Rect {
        Rect::new(0.0, self.row_top(index), width, self.row_height)
    }

    /// Height of `rows` consecutive rows including the gaps between them.
    pub fn rows_extent(&self, rows: usize) -> f64 {
        if rows == 0 {
            return 0.0;
        }
        rows as f64 * self.row_height + (rows - 1) as f64 * self.row_spacing
    }

    /// Total scrollable content height for `item_count` rows.
    pub fn content_height(&self, item_count: usize) -> f64 {
        2.0 * self.vertical_padding + self.rows_extent(item_count)
    }

    /// Largest valid scroll offset for a viewport of `viewport_extent` points.
    pub fn max_scroll_offset(&self, item_count: usize, viewport_extent: f64) -> f64 {
        (self.content_height(item_count) - floor_finite(viewport_extent, 0.0)).max(0.0)
    }

    /// Top of row `index` clamped so the row never scrolls past content end.
    ///
    /// This is the target a native host scrolls to when revealing a row.
    pub fn clamped_row_top(&self, index: usize, item_count: usize) -> f64 {
        let limit = (self.content_height(item_count) - self.row_height).max(0.0);
        self.row_top(index).clamp(0.0, limit)
    }

    /// Row whose step band contains content offset `y`, clamped to the list.
    ///
    /// Offsets are measured from the first row's top (padding removed).
    /// Returns `None` for an empty list.
    pub fn floor_index(&self, y: f64, item_count: usize) -> Option<usize> {
        if item_count == 0 {
            return None;
        }
        let band = (floor_finite(y, 0.0) / self.row_step()).floor();
        // `as` saturates, so huge offsets land on the last row.
        Some((band as usize).min(item_count - 1))
    }

    /// Hit-test a content-space y coordinate.
    ///
    /// Returns `None` in the paddings, in inter-row gaps, or past the end.
    pub fn index_at_offset(&self, y: f64, item_count: usize) -> Option<usize> {
        if item_count == 0 || !y.is_finite() {
            return None;
        }
        let relative = y - self.vertical_padding;
        if relative < 0.0 {
            return None;
        }
        let step = self.row_step();
        let band = (relative / step).floor();
        if band >= item_count as f64 {
            return None;
        }
        let index = band as usize;
        if relative - band * step >= self.row_height {
            return None;
        }
        Some(index)
    }
}

fn floor_finite(value: f64, floor: f64) -> f64 {
    if value.is_finite() { value.max(floor) } else { floor }
}
