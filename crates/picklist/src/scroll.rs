#![forbid(unsafe_code)]

//! Scroll arbitration.
//!
//! Every selection change may need the host to scroll, but hosts differ in
//! what they can do:
//!
//! - [`ScrollPolicy::Bounded`] hosts can only "scroll the row into view". The
//!   arbiter asks for that sparingly: not while the selection sits inside
//!   the safe zone of the visible range, and not twice for the same row.
//! - [`ScrollPolicy::Native`] hosts scroll to an explicit offset. Every
//!   selection change produces a [`ScrollRequest`] carrying a fresh id, and
//!   the host applies each id at most once through a
//!   [`ScrollRequestTracker`].
//!
//! Geometry notifications arrive late and out of order, so the monotonic
//! request id is the only ordering guard between a request and the metrics
//! it eventually causes.

use std::fmt;

use picklist_core::RowGeometry;

use crate::visible::RowSpan;

/// Monotonic identifier of a native scroll request. The first id is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// The raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request for a native host to scroll a row to the top of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    /// Identifier; newer requests have larger ids.
    pub id: RequestId,
    /// Row being revealed.
    pub index: usize,
    /// Target scroll offset, clamped so the row never scrolls past the end.
    pub target_row_top: f64,
    /// Height of the revealed row.
    pub row_height: f64,
}

/// What the host scroll surface can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollPolicy {
    /// Only minimal "scroll into view".
    #[default]
    Bounded,
    /// Scroll to an explicit offset.
    Native,
}

/// Instruction for the host after a selection change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    /// Bounded policy: scroll row `index` minimally into view.
    Reveal(usize),
    /// Native policy: scroll to the request's target.
    Request(ScrollRequest),
}

/// Rows where a selection needs no scroll: `visible` shrunk by
/// `min(max_margin, (last - first) / divisor)` at each end.
///
/// Returns `None` when the shrunk span would be empty.
#[must_use]
pub fn safe_zone(visible: RowSpan, max_margin: usize, divisor: usize) -> Option<RowSpan> {
    let span = visible.last - visible.first;
    let margin = max_margin.min(span / divisor.max(1));
    let first = visible.first + margin;
    let last = visible.last - margin;
    (first <= last).then(|| RowSpan::new(first, last))
}

/// Decides when a selection change becomes a scroll.
#[derive(Debug, Clone)]
pub struct ScrollArbiter {
    policy: ScrollPolicy,
    safe_zone_max_margin: usize,
    safe_zone_divisor: usize,
    last_issued: u64,
    pending: Option<ScrollRequest>,
    last_programmatic_index: Option<usize>,
}

impl ScrollArbiter {
    /// Create an arbiter with the given policy and safe-zone tuning.
    #[must_use]
    pub fn new(
        policy: ScrollPolicy,
        safe_zone_max_margin: usize,
        safe_zone_divisor: usize,
    ) -> Self {
        Self {
            policy,
            safe_zone_max_margin,
            safe_zone_divisor,
            last_issued: 0,
            pending: None,
            last_programmatic_index: None,
        }
    }

    /// The host's scroll policy.
    #[must_use]
    pub fn policy(&self) -> ScrollPolicy {
        self.policy
    }

    /// The newest native request not yet acknowledged.
    #[must_use]
    pub fn pending(&self) -> Option<&ScrollRequest> {
        self.pending.as_ref()
    }

    /// Id of the most recently issued request.
    #[must_use]
    pub fn last_issued(&self) -> Option<RequestId> {
        (self.last_issued > 0).then_some(RequestId(self.last_issued))
    }

    /// Row most recently revealed under the bounded policy.
    #[must_use]
    pub fn last_programmatic_index(&self) -> Option<usize> {
        self.last_programmatic_index
    }

    /// React to the selection moving to `index`.
    ///
    /// `visible` is the measured or computed visible range; pass `None`
    /// before the host has reported any geometry.
    pub fn on_selection_change(
        &mut self,
        index: Option<usize>,
        visible: Option<RowSpan>,
        item_count: usize,
        geometry: &RowGeometry,
    ) -> Option<ScrollCommand> {
        let index = index.filter(|&i| i < item_count)?;
        match self.policy {
            ScrollPolicy::Bounded => self.bounded(index, visible),
            ScrollPolicy::Native => {
                let request = self.issue(index, item_count, geometry);
                Some(ScrollCommand::Request(request))
            }
        }
    }

    fn bounded(&mut self, index: usize, visible: Option<RowSpan>) -> Option<ScrollCommand> {
        let safe = visible
            .and_then(|v| safe_zone(v, self.safe_zone_max_margin, self.safe_zone_divisor));
        if safe.is_some_and(|zone| zone.contains(index)) {
            picklist_core::trace!(index, "selection inside safe zone; no scroll");
            return None;
        }
        if self.last_programmatic_index == Some(index) {
            picklist_core::trace!(index, "row already revealed; no scroll");
            return None;
        }
        self.last_programmatic_index = Some(index);
        Some(ScrollCommand::Reveal(index))
    }

    fn issue(&mut self, index: usize, item_count: usize, geometry: &RowGeometry) -> ScrollRequest {
        self.last_issued += 1;
        let request = ScrollRequest {
            id: RequestId(self.last_issued),
            index,
            target_row_top: geometry.clamped_row_top(index, item_count),
            row_height: geometry.row_height(),
        };
        self.pending = Some(request);
        request
    }

    /// The host reports that request `id` was applied.
    ///
    /// Clears the pending request only when `id` is the newest one; returns
    /// whether it did.
    pub fn acknowledge(&mut self, id: RequestId) -> bool {
        match self.pending {
            Some(pending) if pending.id == id => {
                self.pending = None;
                true
            }
            _ => {
                picklist_core::trace!(
                    request_id = id.get(),
                    "ignoring stale scroll acknowledgement"
                );
                false
            }
        }
    }

    /// Forget the last revealed row.
    ///
    /// Called whenever fresh geometry arrives or the items are replaced: the
    /// host has caught up, so the visible range alone decides again.
    pub fn reset_programmatic(&mut self) {
        self.last_programmatic_index = None;
    }

    /// Drop all in-flight state. The id counter keeps counting.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.last_programmatic_index = None;
    }
}

/// Host-side guard that applies each native request at most once, and never
/// one older than a request already applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollRequestTracker {
    last_handled: Option<RequestId>,
}

impl ScrollRequestTracker {
    /// A tracker that has handled nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the last applied request.
    #[must_use]
    pub fn last_handled(&self) -> Option<RequestId> {
        self.last_handled
    }

    /// Whether `request` is newer than anything applied so far.
    #[must_use]
    pub fn should_apply(&self, request: &ScrollRequest) -> bool {
        self.last_handled.is_none_or(|last| request.id > last)
    }

    /// Run `scroll` for `request` unless it was already handled.
    ///
    /// Returns whether `scroll` ran.
    pub fn apply<F>(&mut self, request: &ScrollRequest, scroll: F) -> bool
    where
        F: FnOnce(&ScrollRequest),
    {
        if !self.should_apply(request) {
            picklist_core::trace!(
                request_id = request.id.get(),
                "scroll request already handled"
            );
            return false;
        }
        scroll(request);
        self.last_handled = Some(request.id);
        true
    }
}
