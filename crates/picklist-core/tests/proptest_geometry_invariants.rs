//! Property-based invariant tests for row geometry.
//!
//! These tests verify invariants that must hold for any inputs, including
//! degenerate heights and paddings:
//!
//! 1. The row step is at least 1 and finite.
//! 2. Row tops are strictly increasing and one step apart.
//! 3. Content height equals padding plus the extent of all rows.
//! 4. Hit-testing a point inside a row returns that row.
//! 5. `floor_index` always lands inside the list.
//! 6. Clamped row tops stay within `[0, content_height - row_height]`.

use picklist_core::geometry::RowGeometry;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn any_dimension() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(-5.0),
        Just(f64::NAN),
        0.0f64..200.0,
    ]
}

fn geometry_strategy() -> impl Strategy<Value = RowGeometry> {
    (any_dimension(), any_dimension(), any_dimension())
        .prop_map(|(h, s, p)| RowGeometry::new(h, s, p))
}

fn sane_geometry_strategy() -> impl Strategy<Value = RowGeometry> {
    (1.0f64..80.0, 0.0f64..10.0, 0.0f64..20.0).prop_map(|(h, s, p)| RowGeometry::new(h, s, p))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Row step is at least 1 and finite
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn row_step_is_at_least_one(g in geometry_strategy()) {
        let step = g.row_step();
        prop_assert!(step.is_finite());
        prop_assert!(step >= 1.0, "step {} below 1 for {:?}", step, g);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Row tops advance by exactly one step
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn row_tops_advance_by_step(g in geometry_strategy(), i in 0usize..10_000) {
        let delta = g.row_top(i + 1) - g.row_top(i);
        prop_assert!((delta - g.row_step()).abs() < 1e-6);
        prop_assert!(g.row_top(i) >= 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Content height decomposition
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn content_height_decomposes(g in geometry_strategy(), n in 0usize..5_000) {
        let expected = 2.0 * g.vertical_padding() + g.rows_extent(n);
        prop_assert!((g.content_height(n) - expected).abs() < 1e-6);
        if n > 0 {
            // Last row ends exactly one padding before the content end.
            let last_bottom = g.row_top(n - 1) + g.row_height();
            let tail = g.content_height(n) - last_bottom;
            prop_assert!((tail - g.vertical_padding()).abs() < 1e-6);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Hit-testing inside a row returns that row
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hit_test_inside_row(
        g in sane_geometry_strategy(),
        n in 1usize..2_000,
        pick in 0usize..2_000,
        frac in 0.01f64..0.99,
    ) {
        let index = pick % n;
        let y = g.row_top(index) + frac * g.row_height();
        prop_assert_eq!(g.index_at_offset(y, n), Some(index));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. floor_index lands inside the list
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn floor_index_in_bounds(g in geometry_strategy(), y in -1e6f64..1e9, n in 0usize..10_000) {
        match g.floor_index(y, n) {
            None => prop_assert_eq!(n, 0),
            Some(index) => prop_assert!(index < n),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Clamped row tops stay inside the content
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamped_row_top_in_content(g in geometry_strategy(), i in 0usize..100_000, n in 0usize..10_000) {
        let top = g.clamped_row_top(i, n);
        let limit = (g.content_height(n) - g.row_height()).max(0.0);
        prop_assert!(top >= 0.0);
        prop_assert!(top <= limit + 1e-9);
    }
}
