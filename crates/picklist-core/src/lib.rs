#![forbid(unsafe_code)]

//! Core: row geometry, per-mount list configuration, and logging.

pub mod geometry;
pub mod list_spec;
pub mod logging;

pub use geometry::{Rect, RowGeometry};
pub use list_spec::ListSpec;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span, warn};
