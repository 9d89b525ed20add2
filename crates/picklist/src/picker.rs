#![forbid(unsafe_code)]

//! The mounted picker list.
//!
//! [`PickerList`] owns every piece of per-mount state: the selection, the
//! reported geometry, the scroll arbiter, hover, and the query line. The
//! host drives it from three sources (data refreshes, keyboard and pointer
//! commands, scroll-surface notifications) and drains two outputs:
//!
//! - [`PickerList::take_events`] for host callbacks (selection, query,
//!   submit, close, scroll).
//! - [`PickerList::render_window`] plus [`PickerList::take_invalidation`]
//!   for the renderer.
//!
//! All calls happen on the UI thread. After [`PickerList::unmount`] every
//! inbound call is ignored.
//!
//! # Example
//!
//! ```
//! use picklist::{ListSpec, PickerEvent, PickerList, ScrollPolicy};
//!
//! let mut picker = PickerList::mount(ListSpec::new(), ScrollPolicy::Bounded);
//! picker.set_items(40, None);
//! picker.move_selection(1);
//! assert_eq!(picker.selected(), Some(1));
//!
//! let events = picker.take_events();
//! assert!(events.contains(&PickerEvent::SelectionChanged(Some(1))));
//! ```

use bitflags::bitflags;
use picklist_core::{ListSpec, Rect, RowGeometry};

use crate::query::QueryLine;
use crate::scroll::{RequestId, ScrollArbiter, ScrollCommand, ScrollPolicy, ScrollRequest};
use crate::scrollbar::ScrollbarMetrics;
use crate::selection::{Resolution, SelectionSync, clamp_index};
use crate::visible::{
    Estimate, EstimateMode, ViewportMetrics, VisibleRange, VisibleRangeEstimator, fallback_range,
};
use crate::window::RenderWindow;

bitflags! {
    /// What changed since the renderer last drew.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Invalidation: u8 {
        /// The selected row changed.
        const SELECTION = 0b0001;
        /// The render window may have moved or resized.
        const WINDOW    = 0b0010;
        /// The query text or cursor changed.
        const QUERY     = 0b0100;
        /// The hovered row changed.
        const HOVER     = 0b1000;
    }
}

/// Outbound notification for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    /// The selection moved (or was cleared).
    SelectionChanged(Option<usize>),
    /// The user edited the query.
    QueryChanged(String),
    /// The user confirmed a row; `None` lets the host decide.
    Submitted(Option<usize>),
    /// The user dismissed the picker.
    Closed,
    /// Native policy: scroll to the request's target.
    ScrollRequested(ScrollRequest),
    /// Bounded policy: scroll the row minimally into view.
    RevealRow(usize),
}

/// One mounted picker list.
#[derive(Debug, Clone)]
pub struct PickerList {
    spec: ListSpec,
    geometry: RowGeometry,
    selection: SelectionSync,
    estimator: VisibleRangeEstimator,
    arbiter: ScrollArbiter,
    query: QueryLine,
    hovered: Option<usize>,
    events: Vec<PickerEvent>,
    invalidation: Invalidation,
    mounted: bool,
}

impl PickerList {
    /// Mount a picker with an empty item list.
    #[must_use]
    pub fn mount(spec: ListSpec, policy: ScrollPolicy) -> Self {
        picklist_core::debug!(spec = %spec.to_json(), ?policy, "picker mounted");
        Self {
            geometry: spec.row_geometry(),
            selection: SelectionSync::new(&spec),
            estimator: VisibleRangeEstimator::new(),
            arbiter: ScrollArbiter::new(
                policy,
                spec.safe_zone_max_margin,
                spec.safe_zone_divisor,
            ),
            query: QueryLine::new(),
            hovered: None,
            events: Vec::new(),
            invalidation: Invalidation::all(),
            mounted: true,
            spec,
        }
    }

    // --- Accessors ---

    /// The configuration this picker was mounted with.
    pub fn spec(&self) -> &ListSpec {
        &self.spec
    }

    /// Normalized row arithmetic.
    pub fn geometry(&self) -> &RowGeometry {
        &self.geometry
    }

    /// Whether the picker is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of items currently listed.
    pub fn item_count(&self) -> usize {
        self.selection.item_count()
    }

    /// The selected row.
    pub fn selected(&self) -> Option<usize> {
        self.selection.selected()
    }

    /// The row under the pointer.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// The query line.
    pub fn query(&self) -> &QueryLine {
        &self.query
    }

    /// The scroll arbiter, for inspecting pending requests.
    pub fn arbiter(&self) -> &ScrollArbiter {
        &self.arbiter
    }

    // --- Data source ---

    /// Replace the item list after the external filter ran.
    ///
    /// `external` is the host's preferred selection, if it has one.
    pub fn set_items(&mut self, item_count: usize, external: Option<usize>) {
        if !self.live("set_items") {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "picklist.set_items",
            item_count,
            external = ?external
        )
        .entered();

        self.estimator.retain_rows(item_count);
        self.arbiter.reset_programmatic();
        if self.hovered.take().is_some() {
            self.invalidation |= Invalidation::HOVER;
        }
        self.invalidation |= Invalidation::WINDOW;
        let resolution = self.selection.sync(item_count, external, &self.spec);
        self.apply_selection(resolution);
    }

    /// Push the host's query text. Emits no event.
    pub fn set_query(&mut self, query: &str) {
        if !self.live("set_query") {
            return;
        }
        if self.query.set_value(query) {
            self.invalidation |= Invalidation::QUERY;
        }
    }

    // --- Query editing ---

    /// Apply a user edit to the query line.
    ///
    /// `edit` returns whether the text changed; if it did, the host is told
    /// through [`PickerEvent::QueryChanged`].
    pub fn edit_query<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut QueryLine) -> bool,
    {
        if !self.live("edit_query") {
            return;
        }
        self.invalidation |= Invalidation::QUERY;
        if edit(&mut self.query) {
            self.events
                .push(PickerEvent::QueryChanged(self.query.value().to_owned()));
        }
    }

    /// Type `text` at the query cursor.
    pub fn type_text(&mut self, text: &str) {
        self.edit_query(|query| query.insert_str(text));
    }

    /// Backspace in the query line.
    pub fn backspace(&mut self) {
        self.edit_query(QueryLine::delete_back);
    }

    // --- Scroll surface ---

    /// Native scroll position changed.
    pub fn report_viewport_metrics(&mut self, scroll_offset: f64, viewport_extent: f64) {
        if !self.live("report_viewport_metrics") {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "picklist.report_viewport_metrics",
            scroll_offset,
            viewport_extent
        )
        .entered();

        self.estimator
            .report_metrics(ViewportMetrics::new(scroll_offset, viewport_extent));
        self.arbiter.reset_programmatic();
        self.invalidation |= Invalidation::WINDOW;
    }

    /// A row was laid out at `frame` (content coordinates).
    pub fn report_row_frame(&mut self, index: usize, frame: Rect) {
        if !self.live("report_row_frame") {
            return;
        }
        if index >= self.item_count() {
            picklist_core::trace!(index, "frame for a row past the end ignored");
            return;
        }
        self.estimator.report_row_frame(index, frame);
        self.arbiter.reset_programmatic();
        self.invalidation |= Invalidation::WINDOW;
    }

    /// A row is no longer materialized.
    pub fn forget_row_frame(&mut self, index: usize) {
        if !self.live("forget_row_frame") {
            return;
        }
        self.estimator.forget_row_frame(index);
        self.arbiter.reset_programmatic();
        self.invalidation |= Invalidation::WINDOW;
    }

    /// The viewport's frame moved (content coordinates).
    pub fn report_viewport_frame(&mut self, frame: Rect) {
        if !self.live("report_viewport_frame") {
            return;
        }
        self.estimator.report_viewport_frame(frame);
        self.arbiter.reset_programmatic();
        self.invalidation |= Invalidation::WINDOW;
    }

    /// The host applied scroll request `id`.
    pub fn acknowledge_scroll(&mut self, id: RequestId) -> bool {
        self.live("acknowledge_scroll") && self.arbiter.acknowledge(id)
    }

    // --- Commands ---

    /// Move the selection `delta` rows, wrapping past either end.
    pub fn move_selection(&mut self, delta: isize) {
        if !self.live("move_selection") {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "picklist.move_selection",
            delta,
            item_count = self.item_count()
        )
        .entered();

        let resolution = self.selection.move_by(delta);
        self.apply_selection(resolution);
    }

    /// Move down one page.
    pub fn page_down(&mut self) {
        self.move_selection(self.page_delta());
    }

    /// Move up one page.
    pub fn page_up(&mut self) {
        self.move_selection(-self.page_delta());
    }

    /// Select row `index` (pointer click).
    pub fn select_index(&mut self, index: usize) {
        if !self.live("select_index") {
            return;
        }
        let resolution = self.selection.select(Some(index));
        self.apply_selection(resolution);
    }

    /// Select row `index` and submit it (double click).
    pub fn activate_index(&mut self, index: usize) {
        self.select_index(index);
        self.submit_selected();
    }

    /// Hover the row at content-space `y`, or nothing over padding and gaps.
    pub fn hover_at(&mut self, y: f64) {
        let index = self.geometry.index_at_offset(y, self.item_count());
        self.set_hovered(index);
    }

    /// Set the hovered row; `None` when the pointer leaves.
    pub fn set_hovered(&mut self, index: Option<usize>) {
        if !self.live("set_hovered") {
            return;
        }
        let index = index.filter(|&i| i < self.item_count());
        if index != self.hovered {
            self.hovered = index;
            self.invalidation |= Invalidation::HOVER;
        }
    }

    /// Confirm row `index`; `None` lets the host decide.
    pub fn submit(&mut self, index: Option<usize>) {
        if !self.live("submit") {
            return;
        }
        let index = clamp_index(index, self.item_count());
        picklist_core::debug!(?index, "picker submitted");
        self.events.push(PickerEvent::Submitted(index));
    }

    /// Confirm the current selection (Enter).
    pub fn submit_selected(&mut self) {
        self.submit(self.selected());
    }

    /// Dismiss the picker. The host unmounts it afterwards.
    pub fn close(&mut self) {
        if !self.live("close") {
            return;
        }
        self.events.push(PickerEvent::Closed);
    }

    /// Tear down: drop queued events, the pending scroll request, hover, and
    /// all reported geometry. Later calls are ignored.
    pub fn unmount(&mut self) {
        if !self.live("unmount") {
            return;
        }
        picklist_core::debug!(
            dropped_events = self.events.len(),
            "picker unmounted"
        );
        self.mounted = false;
        self.events.clear();
        self.arbiter.cancel();
        self.estimator.reset();
        self.hovered = None;
        self.invalidation = Invalidation::empty();
    }

    // --- Outputs ---

    /// Drain queued host notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<PickerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drain the accumulated invalidation.
    pub fn take_invalidation(&mut self) -> Invalidation {
        std::mem::take(&mut self.invalidation)
    }

    /// Visible-range estimate from the strongest geometry available.
    pub fn estimate(&self) -> Estimate {
        self.estimator
            .estimate(self.item_count(), self.selected(), &self.spec)
    }

    /// Rows on screen, if any.
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.estimate().range
    }

    /// Rows to materialize and the spacers around them.
    pub fn render_window(&self) -> RenderWindow {
        let item_count = self.item_count();
        let estimate = self.estimate();
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "picklist.render_window",
            item_count,
            mode = ?estimate.mode,
            overscan = self.spec.overscan_rows
        )
        .entered();

        let visible = estimate
            .range
            .or_else(|| fallback_range(self.selected(), item_count, &self.spec));
        match visible {
            Some(visible) => RenderWindow::build(
                visible,
                self.spec.overscan_rows,
                item_count,
                &self.geometry,
            ),
            None => RenderWindow::empty(&self.geometry),
        }
    }

    /// Scrollbar thumb for a track of `track_length` points.
    ///
    /// Needs a native scroll position; `None` before one is reported or
    /// when everything fits.
    pub fn scrollbar(&self, track_length: f64) -> Option<ScrollbarMetrics> {
        let metrics = self.estimator.metrics()?;
        ScrollbarMetrics::compute(
            track_length,
            self.geometry.content_height(self.item_count()),
            metrics.viewport_extent,
            metrics.scroll_offset,
        )
    }

    // --- Internals ---

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn live(&self, op: &'static str) -> bool {
        if !self.mounted {
            picklist_core::debug!(op, "call after unmount ignored");
        }
        self.mounted
    }

    fn page_delta(&self) -> isize {
        isize::try_from(self.spec.page_size).unwrap_or(isize::MAX)
    }

    fn apply_selection(&mut self, resolution: Resolution) {
        if !resolution.changed {
            return;
        }
        self.invalidation |= Invalidation::SELECTION;
        self.events
            .push(PickerEvent::SelectionChanged(resolution.selection));

        let estimate = self.estimate();
        let visible = match estimate.mode {
            // The fallback window is anchored at the selection.
            EstimateMode::Fallback => {
                self.invalidation |= Invalidation::WINDOW;
                None
            }
            EstimateMode::Measured | EstimateMode::Computed => estimate.range,
        };
        let command = self.arbiter.on_selection_change(
            resolution.selection,
            visible,
            self.item_count(),
            &self.geometry,
        );
        match command {
            Some(ScrollCommand::Reveal(index)) => self.events.push(PickerEvent::RevealRow(index)),
            Some(ScrollCommand::Request(request)) => {
                picklist_core::trace!(request_id = request.id.get(), index = request.index);
                self.events.push(PickerEvent::ScrollRequested(request));
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visible::RowSpan;

    fn spec() -> ListSpec {
        ListSpec::new()
            .with_row_height(20.0)
            .with_row_spacing(0.0)
            .with_vertical_padding(0.0)
            .with_overscan(2)
            .with_page_size(5)
            .with_max_list_height(100.0)
    }

    fn bounded(count: usize) -> PickerList {
        let mut picker = PickerList::mount(spec(), ScrollPolicy::Bounded);
        picker.set_items(count, None);
        picker.take_events();
        picker.take_invalidation();
        picker
    }

    fn native(count: usize) -> PickerList {
        let mut picker = PickerList::mount(spec(), ScrollPolicy::Native);
        picker.set_items(count, None);
        picker.take_events();
        picker.take_invalidation();
        picker
    }

    #[test]
    fn mount_invalidates_everything() {
        let mut picker = PickerList::mount(spec(), ScrollPolicy::Bounded);
        assert_eq!(picker.take_invalidation(), Invalidation::all());
        assert!(picker.take_invalidation().is_empty());
        assert!(picker.is_mounted());
    }

    #[test]
    fn first_items_select_row_zero() {
        let mut picker = PickerList::mount(spec(), ScrollPolicy::Bounded);
        picker.set_items(10, None);
        assert_eq!(picker.selected(), Some(0));
        let events = picker.take_events();
        assert_eq!(events[0], PickerEvent::SelectionChanged(Some(0)));
        // No geometry yet: the bounded host is asked to reveal the row.
        assert_eq!(events[1], PickerEvent::RevealRow(0));
    }

    #[test]
    fn unchanged_selection_emits_nothing() {
        let mut picker = bounded(10);
        picker.set_items(12, Some(7));
        assert_eq!(picker.selected(), Some(0));
        assert!(picker.take_events().is_empty());
        assert!(picker.take_invalidation().contains(Invalidation::WINDOW));
    }

    #[test]
    fn paging_moves_by_page_size() {
        let mut picker = bounded(12);
        picker.page_down();
        assert_eq!(picker.selected(), Some(5));
        picker.page_down();
        picker.page_down();
        assert_eq!(picker.selected(), Some(3));
        picker.page_up();
        assert_eq!(picker.selected(), Some(10));
    }

    #[test]
    fn bounded_safe_zone_suppresses_reveal() {
        let mut picker = bounded(50);
        picker.report_viewport_metrics(200.0, 100.0);
        assert_eq!(picker.visible_range(), Some(RowSpan::new(10, 14)));

        picker.select_index(12);
        assert_eq!(
            picker.take_events(),
            vec![PickerEvent::SelectionChanged(Some(12))]
        );

        picker.select_index(0);
        assert_eq!(
            picker.take_events(),
            vec![
                PickerEvent::SelectionChanged(Some(0)),
                PickerEvent::RevealRow(0)
            ]
        );
    }

    #[test]
    fn native_emits_requests_and_acknowledges() {
        let mut picker = native(50);
        picker.move_selection(3);
        let events = picker.take_events();
        let PickerEvent::ScrollRequested(request) = events[1] else {
            panic!("expected a scroll request, got {events:?}");
        };
        assert_eq!(request.index, 3);
        assert_eq!(request.target_row_top, 60.0);
        assert!(picker.acknowledge_scroll(request.id));
        assert!(picker.arbiter().pending().is_none());
    }

    #[test]
    fn render_window_uses_fallback_then_metrics() {
        let mut picker = bounded(100);
        // Fallback: 100pt / 20pt = 5 rows from the selection, plus overscan.
        assert_eq!(picker.render_window().range, Some(RowSpan::new(0, 6)));
        picker.report_viewport_metrics(400.0, 100.0);
        assert_eq!(picker.render_window().range, Some(RowSpan::new(18, 26)));
    }

    #[test]
    fn measured_miss_falls_back_to_selection() {
        let mut picker = bounded(100);
        picker.select_index(40);
        picker.report_row_frame(0, Rect::new(0.0, 0.0, 100.0, 20.0));
        picker.report_viewport_frame(Rect::new(0.0, 5000.0, 100.0, 100.0));
        assert_eq!(picker.estimate().mode, EstimateMode::Measured);
        assert_eq!(picker.visible_range(), None);
        assert_eq!(picker.render_window().range, Some(RowSpan::new(38, 46)));
    }

    #[test]
    fn row_frames_past_end_are_ignored() {
        let mut picker = bounded(3);
        picker.report_row_frame(10, Rect::new(0.0, 200.0, 100.0, 20.0));
        picker.report_viewport_frame(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(picker.estimate().mode, EstimateMode::Fallback);
    }

    #[test]
    fn hover_tracks_pointer_and_clears_on_refresh() {
        let mut picker = bounded(10);
        picker.hover_at(45.0);
        assert_eq!(picker.hovered(), Some(2));
        assert!(picker.take_invalidation().contains(Invalidation::HOVER));
        picker.hover_at(45.0);
        assert!(picker.take_invalidation().is_empty());
        picker.set_items(8, None);
        assert_eq!(picker.hovered(), None);
        picker.set_hovered(Some(30));
        assert_eq!(picker.hovered(), None);
    }

    #[test]
    fn activate_selects_then_submits() {
        let mut picker = bounded(10);
        picker.activate_index(4);
        let events = picker.take_events();
        assert_eq!(events.first(), Some(&PickerEvent::SelectionChanged(Some(4))));
        assert_eq!(events.last(), Some(&PickerEvent::Submitted(Some(4))));
    }

    #[test]
    fn submit_none_defers_to_host() {
        let mut picker = bounded(0);
        picker.submit(Some(3));
        picker.submit(None);
        picker.close();
        assert_eq!(
            picker.take_events(),
            vec![
                PickerEvent::Submitted(None),
                PickerEvent::Submitted(None),
                PickerEvent::Closed
            ]
        );
    }

    #[test]
    fn query_edits_emit_but_pushes_do_not() {
        let mut picker = bounded(10);
        picker.set_query("ope");
        assert!(picker.take_events().is_empty());
        assert!(picker.take_invalidation().contains(Invalidation::QUERY));

        picker.type_text("n");
        picker.backspace();
        assert_eq!(
            picker.take_events(),
            vec![
                PickerEvent::QueryChanged("open".into()),
                PickerEvent::QueryChanged("ope".into())
            ]
        );

        picker.edit_query(|q| {
            q.move_home();
            false
        });
        assert!(picker.take_events().is_empty());
        assert_eq!(picker.query().cursor(), 0);
    }

    #[test]
    fn scrollbar_needs_metrics() {
        let mut picker = bounded(100);
        assert_eq!(picker.scrollbar(100.0), None);
        picker.report_viewport_metrics(0.0, 100.0);
        let bar = picker.scrollbar(100.0).unwrap();
        assert_eq!(bar.max_scroll_offset, 1900.0);
    }

    #[test]
    fn unmount_drops_state_and_ignores_calls() {
        let mut picker = native(10);
        picker.move_selection(1);
        picker.hover_at(5.0);
        picker.unmount();
        assert!(!picker.is_mounted());
        assert!(picker.take_events().is_empty());
        assert!(picker.arbiter().pending().is_none());
        assert_eq!(picker.hovered(), None);

        picker.move_selection(1);
        picker.set_items(3, None);
        picker.report_viewport_metrics(10.0, 10.0);
        picker.close();
        assert_eq!(picker.selected(), Some(1));
        assert!(picker.take_events().is_empty());
        assert!(picker.take_invalidation().is_empty());
    }
}
