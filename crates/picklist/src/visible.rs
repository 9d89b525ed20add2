#![forbid(unsafe_code)]

//! Visible-range estimation.
//!
//! The host scroll surface describes what is on screen in one of two ways:
//! measured frames for each laid-out row plus the viewport's frame, or a raw
//! scroll offset and viewport extent from a native scroll view. Before either
//! arrives the estimator guesses from the list's maximum height so the first
//! paint is never empty.
//!
//! The active source is chosen from which inputs are populated; see
//! [`GeometrySource`].

use std::collections::BTreeMap;
use std::ops::{Range, RangeInclusive};

use picklist_core::{ListSpec, Rect, RowGeometry};

/// A closed, non-empty interval of row indices `[first, last]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowSpan {
    /// First row (inclusive).
    pub first: usize,
    /// Last row (inclusive).
    pub last: usize,
}

/// Rows currently on screen.
pub type VisibleRange = RowSpan;

impl RowSpan {
    /// Create a span, swapping the ends if they arrive reversed.
    #[must_use]
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first: first.min(last),
            last: first.max(last),
        }
    }

    /// Number of rows in the span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Always `false`; a span holds at least one row.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` lies inside the span.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        (self.first..=self.last).contains(&index)
    }

    /// Whether every row of `self` lies inside `other`.
    #[must_use]
    pub fn is_within(&self, other: &RowSpan) -> bool {
        other.first <= self.first && self.last <= other.last
    }

    /// Widen by `margin` rows on both sides, clamped to `[0, item_count)`.
    ///
    /// Returns `None` for an empty list.
    #[must_use]
    pub fn expand(&self, margin: usize, item_count: usize) -> Option<RowSpan> {
        if item_count == 0 {
            return None;
        }
        let max = item_count - 1;
        let first = self.first.saturating_sub(margin).min(max);
        let last = self.last.saturating_add(margin).min(max);
        Some(RowSpan::new(first, last))
    }

    /// Half-open form, for slicing.
    #[must_use]
    pub fn as_range(&self) -> Range<usize> {
        self.first..self.last + 1
    }

    /// Iterate the indices in the span.
    pub fn iter(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Scroll position reported by a native scroll surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportMetrics {
    /// Distance from content top to viewport top.
    pub scroll_offset: f64,
    /// Height of the viewport.
    pub viewport_extent: f64,
}

impl ViewportMetrics {
    /// Create metrics, flooring the offset to 0 and the extent to 1.
    #[must_use]
    pub fn new(scroll_offset: f64, viewport_extent: f64) -> Self {
        let scroll_offset = if scroll_offset.is_finite() {
            scroll_offset.max(0.0)
        } else {
            0.0
        };
        let viewport_extent = if viewport_extent.is_finite() {
            viewport_extent.max(1.0)
        } else {
            1.0
        };
        Self {
            scroll_offset,
            viewport_extent,
        }
    }
}

/// Which geometry the estimate was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstimateMode {
    /// Row frames intersected against the viewport frame.
    Measured,
    /// Arithmetic over the native scroll offset and extent.
    Computed,
    /// No geometry yet; anchored at the selection.
    Fallback,
}

/// Geometry inputs available to the estimator, strongest first.
#[derive(Debug, Clone, Copy)]
pub enum GeometrySource<'a> {
    /// Laid-out row frames and the viewport frame, in content coordinates.
    Measured {
        /// Frames keyed by row index.
        rows: &'a BTreeMap<usize, Rect>,
        /// The viewport's frame.
        viewport: Rect,
    },
    /// Offset and extent from a native scroll view.
    Computed(ViewportMetrics),
    /// Nothing reported yet.
    Fallback,
}

impl GeometrySource<'_> {
    /// The mode this source produces.
    #[must_use]
    pub fn mode(&self) -> EstimateMode {
        match self {
            Self::Measured { .. } => EstimateMode::Measured,
            Self::Computed(_) => EstimateMode::Computed,
            Self::Fallback => EstimateMode::Fallback,
        }
    }
}

/// A visible range together with the mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Estimate {
    /// How the range was derived.
    pub mode: EstimateMode,
    /// The rows on screen; `None` when nothing is (yet) on screen.
    pub range: Option<VisibleRange>,
}

/// Rows whose frames intersect the viewport frame.
pub fn measured_range(
    rows: &BTreeMap<usize, Rect>,
    viewport: &Rect,
    item_count: usize,
) -> Option<VisibleRange> {
    let mut hits = rows
        .range(..item_count)
        .filter(|(_, frame)| frame.intersects_vertically(viewport))
        .map(|(index, _)| *index);
    let first = hits.next()?;
    let last = hits.last().unwrap_or(first);
    Some(RowSpan::new(first, last))
}

/// Rows covered by a scroll offset and viewport extent.
pub fn computed_range(
    metrics: ViewportMetrics,
    item_count: usize,
    geometry: &RowGeometry,
) -> Option<VisibleRange> {
    let padding = geometry.vertical_padding();
    let start_y = (metrics.scroll_offset - padding).max(0.0);
    let end_y = (metrics.scroll_offset + metrics.viewport_extent - padding).max(0.0);
    let first = geometry.floor_index(start_y, item_count)?;
    let last = geometry.floor_index((end_y - 1.0).max(0.0), item_count)?;
    Some(RowSpan::new(first, last.max(first)))
}

/// Rows likely on screen before any geometry is known.
///
/// Anchors at `anchor` (or row 0) and spans as many rows as fit in the
/// list's maximum height.
pub fn fallback_range(
    anchor: Option<usize>,
    item_count: usize,
    spec: &ListSpec,
) -> Option<VisibleRange> {
    if item_count == 0 {
        return None;
    }
    let step = spec.row_geometry().row_step();
    let max_height = if spec.max_list_height.is_finite() {
        spec.max_list_height.max(0.0)
    } else {
        0.0
    };
    let estimated = ((max_height / step).ceil() as usize).max(1);
    let anchor = anchor.unwrap_or(0).min(item_count - 1);
    let last = anchor.saturating_add(estimated - 1).min(item_count - 1);
    Some(RowSpan::new(anchor, last))
}

/// Geometry reported by the host, and the estimate derived from it.
#[derive(Debug, Clone, Default)]
pub struct VisibleRangeEstimator {
    row_frames: BTreeMap<usize, Rect>,
    viewport_frame: Option<Rect>,
    metrics: Option<ViewportMetrics>,
}

impl VisibleRangeEstimator {
    /// Create an estimator with no geometry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the laid-out frame of one row.
    pub fn report_row_frame(&mut self, index: usize, frame: Rect) {
        self.row_frames.insert(index, frame);
    }

    /// Drop a row's frame once the host stops materializing it.
    pub fn forget_row_frame(&mut self, index: usize) {
        self.row_frames.remove(&index);
    }

    /// Record the viewport frame.
    pub fn report_viewport_frame(&mut self, frame: Rect) {
        self.viewport_frame = Some(frame);
    }

    /// Record a native scroll position.
    pub fn report_metrics(&mut self, metrics: ViewportMetrics) {
        self.metrics = Some(metrics);
    }

    /// Last native scroll position, if any.
    #[must_use]
    pub fn metrics(&self) -> Option<ViewportMetrics> {
        self.metrics
    }

    /// Discard row frames for indices that no longer exist.
    pub fn retain_rows(&mut self, item_count: usize) {
        self.row_frames.retain(|index, _| *index < item_count);
    }

    /// Forget all geometry.
    pub fn reset(&mut self) {
        self.row_frames.clear();
        self.viewport_frame = None;
        self.metrics = None;
    }

    /// The strongest geometry currently available.
    #[must_use]
    pub fn source(&self) -> GeometrySource<'_> {
        match (self.viewport_frame, self.metrics) {
            (Some(viewport), _) if !self.row_frames.is_empty() => GeometrySource::Measured {
                rows: &self.row_frames,
                viewport,
            },
            (_, Some(metrics)) => GeometrySource::Computed(metrics),
            _ => GeometrySource::Fallback,
        }
    }

    /// Estimate the rows on screen.
    ///
    /// `anchor` is the current selection, used only by the fallback.
    #[must_use]
    pub fn estimate(&self, item_count: usize, anchor: Option<usize>, spec: &ListSpec) -> Estimate {
        let source = self.source();
        let range = match source {
            GeometrySource::Measured { rows, viewport } => {
                measured_range(rows, &viewport, item_count)
            }
            GeometrySource::Computed(metrics) => {
                computed_range(metrics, item_count, &spec.row_geometry())
            }
            GeometrySource::Fallback => fallback_range(anchor, item_count, spec),
        };
        Estimate {
            mode: source.mode(),
            range,
        }
    }
}
