#![forbid(unsafe_code)]

//! Selection synchronization.
//!
//! The picker's item collection is replaced wholesale whenever the external
//! filter produces new results, so the active index must be reconciled on
//! every replacement. The transition functions here are pure; they take the
//! previous selection plus inputs and return the next one.
//! [`SelectionSync`] owns that state for one mounted picker.
//!
//! # Invariants
//!
//! 1. The selection is `None` iff the item count is zero.
//! 2. Otherwise it is a valid index in `[0, item_count)`.
//! 3. `changed` is reported only when the resolved index differs from the
//!    previous one.

use picklist_core::ListSpec;

/// Outcome of reconciling the selection against new inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The selection after reconciliation.
    pub selection: Option<usize>,
    /// Whether `selection` differs from the previous value.
    pub changed: bool,
}

impl Resolution {
    fn between(previous: Option<usize>, selection: Option<usize>) -> Self {
        Self {
            selection,
            changed: selection != previous,
        }
    }
}

/// Clamp an optional index into `[0, item_count)`.
///
/// Returns `None` for an absent index or an empty list.
#[inline]
pub fn clamp_index(index: Option<usize>, item_count: usize) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    index.map(|i| i.min(item_count - 1))
}

/// Reconcile the selection after the item count or external hint changed.
///
/// With auto-select-first enabled, a still-valid previous selection wins and
/// the external hint only fills a vacancy (falling back to row 0). With it
/// disabled the host owns the selection: the clamped hint is adopted, and
/// with no hint the selection is cleared.
pub fn resolve(
    item_count: usize,
    previous: Option<usize>,
    external: Option<usize>,
    spec: &ListSpec,
) -> Resolution {
    let selection = if item_count == 0 {
        None
    } else if let Some(kept) = clamp_index(previous, item_count) {
        if spec.auto_select_first_item {
            Some(kept)
        } else {
            clamp_index(external, item_count)
        }
    } else {
        clamp_index(external, item_count).or(spec.auto_select_first_item.then_some(0))
    };
    Resolution::between(previous, selection)
}

/// Re-establish the selection invariant for a directly assigned value.
pub fn normalize(
    candidate: Option<usize>,
    item_count: usize,
    auto_select_first: bool,
) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    clamp_index(candidate, item_count).or(auto_select_first.then_some(0))
}

/// Step `delta` rows from `current`, wrapping past either end.
///
/// With no current selection a forward step starts before row 0 and a
/// backward step starts after the last row, so `+1` lands on the first row
/// and `-1` on the last. A zero delta keeps an existing selection; from no
/// selection it counts as forward and lands on the last row.
pub fn wrap_step(current: Option<usize>, delta: isize, item_count: usize) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    let current = clamp_index(current, item_count);
    let len = item_count as i128;
    let start = match current {
        Some(i) => i as i128,
        None if delta >= 0 => -1,
        None => len,
    };
    let next = (start + delta as i128).rem_euclid(len);
    Some(next as usize)
}

/// Owned selection state for one mounted picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSync {
    item_count: usize,
    selected: Option<usize>,
    auto_select_first: bool,
}

impl SelectionSync {
    /// Create state for an empty list.
    #[must_use]
    pub fn new(spec: &ListSpec) -> Self {
        Self {
            item_count: 0,
            selected: None,
            auto_select_first: spec.auto_select_first_item,
        }
    }

    /// Number of items currently matching.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// The active index, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Adopt a new item count and external hint.
    pub fn sync(
        &mut self,
        item_count: usize,
        external: Option<usize>,
        spec: &ListSpec,
    ) -> Resolution {
        self.item_count = item_count;
        let resolution = resolve(item_count, self.selected, external, spec);
        self.selected = resolution.selection;
        resolution
    }

    /// Move the selection by `delta` rows with wrap-around.
    pub fn move_by(&mut self, delta: isize) -> Resolution {
        let next = wrap_step(self.selected, delta, self.item_count);
        self.assign(next)
    }

    /// Assign a selection from any path (click, host command).
    pub fn select(&mut self, index: Option<usize>) -> Resolution {
        self.assign(index)
    }

    fn assign(&mut self, candidate: Option<usize>) -> Resolution {
        let previous = self.selected;
        self.selected = normalize(candidate, self.item_count, self.auto_select_first);
        Resolution::between(previous, self.selected)
    }
}
