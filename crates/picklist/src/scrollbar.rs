#![forbid(unsafe_code)]

//! Scrollbar thumb geometry for the list's scroll surface.

/// Smallest thumb length in points, so the thumb stays grabbable over very
/// long lists.
pub const MIN_THUMB_LENGTH: f64 = 16.0;

/// Thumb placement along a scrollbar track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollbarMetrics {
    /// Length of the track.
    pub track_length: f64,
    /// Length of the thumb.
    pub thumb_length: f64,
    /// Distance from the track start to the thumb start.
    pub thumb_offset: f64,
    /// Largest valid scroll offset of the content.
    pub max_scroll_offset: f64,
}

impl ScrollbarMetrics {
    /// Place the thumb for `content_length` points scrolled to
    /// `scroll_offset` inside a viewport of `viewport_length`.
    ///
    /// Returns `None` when the content fits (no scrollbar) or the track has
    /// no length.
    #[must_use]
    pub fn compute(
        track_length: f64,
        content_length: f64,
        viewport_length: f64,
        scroll_offset: f64,
    ) -> Option<Self> {
        let inputs = [track_length, content_length, viewport_length];
        if inputs.iter().any(|v| !v.is_finite()) || track_length <= 0.0 {
            return None;
        }
        let viewport_length = viewport_length.max(1.0);
        if content_length <= viewport_length {
            return None;
        }
        let max_scroll_offset = content_length - viewport_length;
        let thumb_length = (track_length * viewport_length / content_length)
            .max(MIN_THUMB_LENGTH)
            .min(track_length);
        let available = track_length - thumb_length;
        let offset = if scroll_offset.is_finite() {
            scroll_offset.clamp(0.0, max_scroll_offset)
        } else {
            0.0
        };
        Some(Self {
            track_length,
            thumb_length,
            thumb_offset: available * offset / max_scroll_offset,
            max_scroll_offset,
        })
    }

    /// Scroll offset that puts the thumb at `thumb_offset` (for dragging).
    #[must_use]
    pub fn offset_for_thumb(&self, thumb_offset: f64) -> f64 {
        let available = self.track_length - self.thumb_length;
        if available <= 0.0 || !thumb_offset.is_finite() {
            return 0.0;
        }
        (thumb_offset.clamp(0.0, available) / available) * self.max_scroll_offset
    }

    /// Whether a track position falls on the thumb.
    #[must_use]
    pub fn thumb_contains(&self, position: f64) -> bool {
        position >= self.thumb_offset && position < self.thumb_offset + self.thumb_length
    }
}
