//! Shared numeric constants for the radar crate.
//!
//! Pixel values are at unit UI scale; [`crate::style::StyleSheet`] multiplies
//! them by the active scale.

// ── View ────────────────────────────────────────────────────────

/// Zoom inversion pivot: visible extent factor is `ZOOM_PIVOT - zoom`.
/// Calibration value; larger zoom means a smaller visible extent.
pub const ZOOM_PIVOT: f64 = 2.01;

/// Smallest accepted zoom level.
pub const MIN_ZOOM: f64 = 0.01;

/// Largest accepted zoom level.
pub const MAX_ZOOM: f64 = 2.0;

/// Smallest accepted UI scale.
pub const MIN_UI_SCALE: f64 = 0.5;

/// Largest accepted UI scale.
pub const MAX_UI_SCALE: f64 = 2.0;

/// Map id that must exist in every registry.
pub const DEFAULT_MAP_ID: &str = "default";

// ── Markers ─────────────────────────────────────────────────────

/// Entity marker circle radius.
pub const MARKER_RADIUS_PX: f64 = 6.0;

/// Stroke width for markers, aim-lines and death markers.
pub const STROKE_WIDTH_PX: f64 = 3.0;

/// Extra width of the dark outline drawn beneath marker strokes.
pub const SHAPE_OUTLINE_EXTRA_PX: f64 = 2.0;

/// Half the edge length of the "X" death marker.
pub const DEATH_MARKER_HALF_PX: f64 = 6.0;

/// Aim-line length for every entity except the reference.
pub const AIMLINE_SHORT_PX: f64 = 15.0;

/// Aim-line length for the reference entity; reads as a ray across the map.
pub const AIMLINE_LONG_PX: f64 = 1500.0;

/// Entities this far outside the canvas are culled.
pub const CULL_MARGIN_PX: f64 = 15.0;

// ── Text ────────────────────────────────────────────────────────

/// Label text size.
pub const LABEL_TEXT_PX: f64 = 12.0;

/// Label offset to the right of the marker.
pub const LABEL_OFFSET_X_PX: f64 = 9.0;

/// Label offset below the marker.
pub const LABEL_OFFSET_Y_PX: f64 = 3.0;

/// Vertical advance between label lines.
pub const LABEL_LINE_HEIGHT_PX: f64 = 12.0;

/// Stroke width of the text outline pass.
pub const TEXT_OUTLINE_WIDTH_PX: f64 = 2.0;

/// Status overlay text size.
pub const STATUS_TEXT_PX: f64 = 48.0;

/// Milliseconds between status ellipsis steps.
pub const STATUS_STEP_MS: f64 = 1000.0;
