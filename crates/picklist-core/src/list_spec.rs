#![forbid(unsafe_code)]

//! Per-mount list configuration.
//!
//! A [`ListSpec`] is built once when a picker opens and handed to the engine
//! by value; the engine never mutates it. Defaults describe the desktop
//! palette and can be overridden from the environment, which keeps tuning
//! values (overscan, safe-zone margin, page size) adjustable without a
//! rebuild.

use crate::geometry::RowGeometry;

/// Environment variable overriding the row height in points.
const ENV_ROW_HEIGHT: &str = "PICKLIST_ROW_HEIGHT";
/// Environment variable overriding the spacing between rows in points.
const ENV_ROW_SPACING: &str = "PICKLIST_ROW_SPACING";
/// Environment variable overriding the vertical content padding.
const ENV_VERTICAL_PADDING: &str = "PICKLIST_VERTICAL_PADDING";
/// Environment variable overriding the horizontal content padding.
const ENV_HORIZONTAL_PADDING: &str = "PICKLIST_HORIZONTAL_PADDING";
/// Environment variable overriding the overscan row count.
const ENV_OVERSCAN_ROWS: &str = "PICKLIST_OVERSCAN_ROWS";
/// Environment variable overriding auto-select-first (`1/0/true/false`).
const ENV_AUTO_SELECT_FIRST: &str = "PICKLIST_AUTO_SELECT_FIRST";
/// Environment variable overriding the page navigation size.
const ENV_PAGE_SIZE: &str = "PICKLIST_PAGE_SIZE";
/// Environment variable overriding the maximum list height.
const ENV_MAX_LIST_HEIGHT: &str = "PICKLIST_MAX_LIST_HEIGHT";

/// Immutable configuration for one mounted picker list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListSpec {
    /// Height of every row in points.
    pub row_height: f64,
    /// Gap between consecutive rows in points.
    pub row_spacing: f64,
    /// Padding above the first row and below the last.
    pub vertical_padding: f64,
    /// Padding left and right of row content.
    pub horizontal_padding: f64,
    /// Rows materialized beyond each edge of the visible range.
    pub overscan_rows: usize,
    /// Select row 0 whenever items appear and nothing valid is selected.
    ///
    /// When `false` the host owns the selection: data refreshes adopt the
    /// host's hint and never invent one.
    pub auto_select_first_item: bool,
    /// Rows moved by page up / page down.
    pub page_size: usize,
    /// Upper bound of the list's on-screen height, used to estimate the
    /// visible row count before any geometry is reported.
    pub max_list_height: f64,
    /// Upper bound of the safe-zone margin, in rows.
    pub safe_zone_max_margin: usize,
    /// The safe-zone margin is `visible_span / safe_zone_divisor`, capped by
    /// [`safe_zone_max_margin`](Self::safe_zone_max_margin).
    pub safe_zone_divisor: usize,
}

impl Default for ListSpec {
    fn default() -> Self {
        Self {
            row_height: 28.0,
            row_spacing: 2.0,
            vertical_padding: 6.0,
            horizontal_padding: 8.0,
            overscan_rows: 8,
            auto_select_first_item: true,
            page_size: 12,
            max_list_height: 420.0,
            safe_zone_max_margin: 2,
            safe_zone_divisor: 4,
        }
    }
}

impl ListSpec {
    /// Create a spec with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect a spec from the process environment on top of the defaults.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build a spec from a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_env_overrides(get_env)
    }

    /// Layer environment overrides on top of this spec.
    ///
    /// Values that fail to parse are ignored and the existing value is kept.
    #[must_use]
    pub fn with_env_overrides<F>(mut self, get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env_override(&get_env, ENV_ROW_HEIGHT, parse_points) {
            self.row_height = v;
        }
        if let Some(v) = env_override(&get_env, ENV_ROW_SPACING, parse_points) {
            self.row_spacing = v;
        }
        if let Some(v) = env_override(&get_env, ENV_VERTICAL_PADDING, parse_points) {
            self.vertical_padding = v;
        }
        if let Some(v) = env_override(&get_env, ENV_HORIZONTAL_PADDING, parse_points) {
            self.horizontal_padding = v;
        }
        if let Some(v) = env_override(&get_env, ENV_OVERSCAN_ROWS, parse_count) {
            self.overscan_rows = v;
        }
        if let Some(v) = env_override(&get_env, ENV_AUTO_SELECT_FIRST, parse_bool) {
            self.auto_select_first_item = v;
        }
        if let Some(v) = env_override(&get_env, ENV_PAGE_SIZE, parse_count) {
            self.page_size = v;
        }
        if let Some(v) = env_override(&get_env, ENV_MAX_LIST_HEIGHT, parse_points) {
            self.max_list_height = v;
        }
        self
    }

    /// Set the row height.
    #[must_use]
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Set the spacing between rows.
    #[must_use]
    pub fn with_row_spacing(mut self, row_spacing: f64) -> Self {
        self.row_spacing = row_spacing;
        self
    }

    /// Set the vertical padding.
    #[must_use]
    pub fn with_vertical_padding(mut self, padding: f64) -> Self {
        self.vertical_padding = padding;
        self
    }

    /// Set the horizontal padding.
    #[must_use]
    pub fn with_horizontal_padding(mut self, padding: f64) -> Self {
        self.horizontal_padding = padding;
        self
    }

    /// Set the overscan amount.
    #[must_use]
    pub fn with_overscan(mut self, rows: usize) -> Self {
        self.overscan_rows = rows;
        self
    }

    /// Enable or disable auto-selecting the first item.
    #[must_use]
    pub fn with_auto_select_first(mut self, enabled: bool) -> Self {
        self.auto_select_first_item = enabled;
        self
    }

    /// Set the page navigation size.
    #[must_use]
    pub fn with_page_size(mut self, rows: usize) -> Self {
        self.page_size = rows;
        self
    }

    /// Set the maximum list height used before geometry is known.
    #[must_use]
    pub fn with_max_list_height(mut self, height: f64) -> Self {
        self.max_list_height = height;
        self
    }

    /// Set the safe-zone tuning (`min(max_margin, span / divisor)`).
    #[must_use]
    pub fn with_safe_zone(mut self, max_margin: usize, divisor: usize) -> Self {
        self.safe_zone_max_margin = max_margin;
        self.safe_zone_divisor = divisor;
        self
    }

    /// Normalized row arithmetic for this spec.
    #[must_use]
    pub fn row_geometry(&self) -> RowGeometry {
        RowGeometry::new(self.row_height, self.row_spacing, self.vertical_padding)
    }

    /// Serialize the spec to JSON (for diagnostics logs).
    #[must_use]
    pub fn to_json(&self) -> String {
        format!(
            concat!(
                r#"{{"row_height":{},"row_spacing":{},"vertical_padding":{},"horizontal_padding":{},"#,
                r#""overscan_rows":{},"auto_select_first_item":{},"page_size":{},"max_list_height":{},"#,
                r#""safe_zone_max_margin":{},"safe_zone_divisor":{}}}"#
            ),
            self.row_height,
            self.row_spacing,
            self.vertical_padding,
            self.horizontal_padding,
            self.overscan_rows,
            self.auto_select_first_item,
            self.page_size,
            self.max_list_height,
            self.safe_zone_max_margin,
            self.safe_zone_divisor
        )
    }
}

fn env_override<F, T>(get_env: &F, key: &str, parse: fn(&str) -> Option<T>) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = get_env(key)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        crate::warn!(key, value = raw.as_str(), "ignoring unparsable list override");
    }
    parsed
}

fn parse_points(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_count(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
