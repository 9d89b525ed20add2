#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! These tests verify that the engine's span instrumentation carries the
//! expected names and fields.
//!
//! Engine spans enabled:
//!   cargo test -p picklist --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p picklist --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use picklist::{ListSpec, PickerList, ScrollPolicy};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its metadata and parent info.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A tracing Layer that captures span metadata.
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl SpanCapture {
    fn new() -> (Self, CaptureHandle) {
        let spans = Arc::new(Mutex::new(Vec::new()));
        let handle = CaptureHandle {
            spans: spans.clone(),
        };
        (Self { spans }, handle)
    }
}

/// Handle to read captured spans after the engine ran.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn named(&self, name: &str) -> Vec<CapturedSpan> {
        self.spans()
            .into_iter()
            .filter(|s| s.name == name)
            .collect()
    }
}

/// Visitor that extracts span fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }
}

/// Set up a tracing subscriber with span capture and run a closure.
fn with_captured_spans<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let (layer, handle) = SpanCapture::new();
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    handle
}

fn drive_picker() {
    let mut picker = PickerList::mount(ListSpec::new(), ScrollPolicy::Native);
    picker.set_items(120, Some(4));
    picker.report_viewport_metrics(300.0, 200.0);
    picker.move_selection(-3);
    let _ = picker.render_window();
}

// ============================================================================
// Unit Tests
// ============================================================================

/// Every engine operation opens its span.
#[test]
#[cfg(feature = "tracing")]
fn spans_created_for_engine_operations() {
    let handle = with_captured_spans(drive_picker);

    for name in [
        "picklist.set_items",
        "picklist.report_viewport_metrics",
        "picklist.move_selection",
        "picklist.render_window",
    ] {
        assert_eq!(handle.named(name).len(), 1, "expected one {name} span");
    }
}

/// Span fields carry the operation's inputs.
#[test]
#[cfg(feature = "tracing")]
fn span_fields_recorded() {
    let handle = with_captured_spans(drive_picker);

    let set_items = &handle.named("picklist.set_items")[0];
    assert_eq!(set_items.fields.get("item_count").map(String::as_str), Some("120"));
    assert_eq!(set_items.fields.get("external").map(String::as_str), Some("Some(4)"));

    let moved = &handle.named("picklist.move_selection")[0];
    assert_eq!(moved.fields.get("delta").map(String::as_str), Some("-3"));
    assert_eq!(moved.fields.get("item_count").map(String::as_str), Some("120"));

    let window = &handle.named("picklist.render_window")[0];
    assert_eq!(window.fields.get("mode").map(String::as_str), Some("Computed"));
    assert_eq!(window.fields.get("overscan").map(String::as_str), Some("8"));
}

/// Calls after unmount open no spans.
#[test]
#[cfg(feature = "tracing")]
fn unmounted_picker_opens_no_spans() {
    let handle = with_captured_spans(|| {
        let mut picker = PickerList::mount(ListSpec::new(), ScrollPolicy::Bounded);
        picker.unmount();
        picker.set_items(10, None);
        picker.move_selection(1);
    });

    assert!(handle.named("picklist.set_items").is_empty());
    assert!(handle.named("picklist.move_selection").is_empty());
}

/// Zero-overhead verification.
///
/// When compiled WITHOUT `--features tracing`, the `#[cfg(feature = "tracing")]`
/// blocks are removed by the compiler. This test verifies that no engine
/// spans appear in that case.
#[test]
fn zero_overhead_when_disabled() {
    let handle = with_captured_spans(drive_picker);

    let engine_spans: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name.starts_with("picklist."))
        .collect();

    #[cfg(feature = "tracing")]
    assert!(!engine_spans.is_empty(), "tracing enabled but no spans captured");

    #[cfg(not(feature = "tracing"))]
    assert!(
        engine_spans.is_empty(),
        "tracing disabled but captured {} spans",
        engine_spans.len()
    );
}
