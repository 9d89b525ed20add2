#![forbid(unsafe_code)]

//! Virtualized picker list engine.
//!
//! A picker shows a long, externally filtered list inside a fixed-height
//! panel. This crate keeps the selection valid across filter refreshes,
//! decides which rows to materialize, and tells the host when to scroll.
//! It draws nothing; hosts render the [`RenderWindow`] and feed geometry back.
//!
//! | Module | Role |
//! |--------|------|
//! | [`selection`] | Selection reconciliation and wrap-around navigation |
//! | [`visible`] | Visible-range estimation (measured, computed, fallback) |
//! | [`window`] | Render range with overscan and spacer heights |
//! | [`scroll`] | Scroll arbitration for bounded and native hosts |
//! | [`scrollbar`] | Scrollbar thumb geometry |
//! | [`query`] | Query line editing |
//! | [`picker`] | [`PickerList`], the mounted engine tying these together |

pub mod picker;
pub mod query;
pub mod scroll;
pub mod scrollbar;
pub mod selection;
pub mod visible;
pub mod window;

pub use picker::{Invalidation, PickerEvent, PickerList};
pub use picklist_core::{ListSpec, Rect, RowGeometry};
pub use query::QueryLine;
pub use scroll::{
    RequestId, ScrollArbiter, ScrollCommand, ScrollPolicy, ScrollRequest, ScrollRequestTracker,
};
pub use scrollbar::ScrollbarMetrics;
pub use selection::SelectionSync;
pub use visible::{EstimateMode, RowSpan, ViewportMetrics, VisibleRange};
pub use window::{RenderRange, RenderWindow};
