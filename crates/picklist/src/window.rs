#![forbid(unsafe_code)]

//! Render windows: the rows to materialize plus the spacers that stand in
//! for everything else.
//!
//! Only the render range is laid out. The top spacer covers the padding and
//! every row above the range, the bottom spacer every row below it, so the
//! host's scroll content keeps its full height and scroll position stays
//! stable as the window slides.

use picklist_core::RowGeometry;

use crate::visible::RowSpan;

/// Rows to materialize: the visible range widened by the overscan.
pub type RenderRange = RowSpan;

/// Widen `visible` by `overscan` rows on each side, clamped to the list.
#[must_use]
pub fn render_range(
    visible: RowSpan,
    overscan: usize,
    item_count: usize,
) -> Option<RenderRange> {
    visible.expand(overscan, item_count)
}

/// A render range and the spacer heights around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderWindow {
    /// Rows to materialize; `None` for an empty list.
    pub range: Option<RenderRange>,
    /// Height standing in for the padding and all rows above the range.
    pub top_spacer: f64,
    /// Height standing in for all rows below the range and the padding.
    pub bottom_spacer: f64,
    /// Full scrollable content height.
    pub content_height: f64,
}

impl RenderWindow {
    /// The window for an empty list: padding only.
    #[must_use]
    pub fn empty(geometry: &RowGeometry) -> Self {
        let padding = geometry.vertical_padding();
        Self {
            range: None,
            top_spacer: padding,
            bottom_spacer: padding,
            content_height: geometry.content_height(0),
        }
    }

    /// Build the window around `visible`.
    ///
    /// Returns [`RenderWindow::empty`] when `item_count` is zero.
    #[must_use]
    pub fn build(
        visible: RowSpan,
        overscan: usize,
        item_count: usize,
        geometry: &RowGeometry,
    ) -> Self {
        let Some(range) = render_range(visible, overscan, item_count) else {
            return Self::empty(geometry);
        };
        let step = geometry.row_step();
        let below = item_count - 1 - range.last;
        Self {
            range: Some(range),
            top_spacer: geometry.row_top(range.first),
            bottom_spacer: geometry.vertical_padding() + below as f64 * step,
            content_height: geometry.content_height(item_count),
        }
    }

    /// Number of rows to materialize.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.range.map_or(0, |range| range.len())
    }

    /// Whether nothing is materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    /// Whether row `index` is materialized.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range.is_some_and(|range| range.contains(index))
    }

    /// Height of the materialized rows including the gaps between them.
    #[must_use]
    pub fn rendered_height(&self, geometry: &RowGeometry) -> f64 {
        geometry.rows_extent(self.row_count())
    }

    /// Iterate the materialized row indices.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        self.range.into_iter().flat_map(|range| range.iter())
    }
}
