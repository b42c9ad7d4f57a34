//! Coordinate pipeline: world space → map plane → screen.
//!
//! World positions use a Y-up convention. The map plane is the calibrated
//! bitmap's pixel space (X right, Y down), so world `z` becomes map `y`
//! (negated) and world `y` is carried separately as height.
//!
//! Every function here is pure; the renderer calls them once per entity per
//! frame.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::f64::consts::PI;
use std::sync::Arc;

use telemetry::Vec3;

use crate::consts::{MAX_ZOOM, MIN_ZOOM, ZOOM_PIVOT};
use crate::maps::MapBundle;

/// A point in either map-plane or screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative, or not a number.
    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// The rectangle `(0, 0) .. (width, height)`.
    #[must_use]
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Axis-aligned rectangle stored as edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }

    /// Rectangle of the given extent centered on `center`.
    #[must_use]
    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(center.x - hw, center.y - hh, center.x + hw, center.y + hh)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Grow every edge outward by `margin`.
    #[must_use]
    pub fn inflate(&self, margin: f64) -> Self {
        Self::new(self.left - margin, self.top - margin, self.right + margin, self.bottom + margin)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.top && p.y <= self.bottom
    }

    /// Grow the shorter dimension about the center until the aspect ratio
    /// matches `target`. Never shrinks. Degenerate inputs are returned as-is.
    #[must_use]
    pub fn aspect_fill(&self, target: Size) -> Self {
        let (w, h) = (self.width(), self.height());
        if target.is_empty() || !(w > 0.0 && h > 0.0) {
            return *self;
        }
        let target_aspect = target.width / target.height;
        let (new_w, new_h) = if w / h < target_aspect {
            (h * target_aspect, h)
        } else {
            (w, w / target_aspect)
        };
        Self::from_center(self.center(), new_w, new_h)
    }
}

/// A position on the map plane plus the world height it was projected from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPos {
    pub x: f64,
    pub y: f64,
    /// World `y`; not a map-plane coordinate.
    pub height: f64,
}

impl MapPos {
    /// The map-plane part, dropping height.
    #[must_use]
    pub fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Per-frame view: which slice of the map bitmap fills the canvas.
#[derive(Debug, Clone)]
pub struct ViewParameters {
    /// Source crop in map-plane coordinates.
    pub bounds: Rect,
    /// Canvas pixels per map pixel, horizontally.
    pub x_scale: f64,
    /// Canvas pixels per map pixel, vertically.
    pub y_scale: f64,
    /// The bundle the bounds refer to.
    pub map: Arc<MapBundle>,
}

/// Project a world position onto the bundle's map plane.
#[must_use]
pub fn world_to_map(pos: Vec3, bundle: &MapBundle) -> MapPos {
    let cal = bundle.calibration();
    MapPos {
        x: cal.x + f64::from(pos.x) * cal.scale,
        y: cal.y - f64::from(pos.z) * cal.scale,
        height: f64::from(pos.y),
    }
}

/// Derive the view for one frame.
///
/// The visible extent is the bundle image scaled by `ZOOM_PIVOT - zoom`,
/// centered on `follow`, then aspect-filled to the canvas so the image covers
/// it without letterboxing. `zoom` is clamped to `[MIN_ZOOM, MAX_ZOOM]`.
#[must_use]
pub fn compute_view_parameters(canvas: Size, bundle: &Arc<MapBundle>, follow: Point, zoom: f64) -> ViewParameters {
    let inv_zoom = ZOOM_PIVOT - zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    let image = bundle.image();
    let extent_w = f64::from(image.width) * inv_zoom;
    let extent_h = f64::from(image.height) * inv_zoom;

    let bounds = Rect::from_center(follow, extent_w, extent_h).aspect_fill(canvas);

    ViewParameters {
        bounds,
        x_scale: canvas.width / bounds.width(),
        y_scale: canvas.height / bounds.height(),
        map: Arc::clone(bundle),
    }
}

/// Convert a map-plane point to canvas pixels.
#[must_use]
pub fn map_to_screen(map_pos: Point, view: &ViewParameters) -> Point {
    Point {
        x: (map_pos.x - view.bounds.left) * view.x_scale,
        y: (map_pos.y - view.bounds.top) * view.y_scale,
    }
}

/// Screen-space facing in degrees: `bearing - 90`, lifted into non-negative
/// range by whole turns. Values at or above 360 are left alone.
#[must_use]
pub fn map_bearing_deg(bearing_deg: f64) -> f64 {
    let rotated = bearing_deg - 90.0;
    if rotated < 0.0 {
        // Same result as adding 360 until non-negative, without the loop.
        rotated.rem_euclid(360.0)
    } else {
        rotated
    }
}

/// Unit direction vector on screen for a raw world bearing.
#[must_use]
pub fn aim_direction(bearing_deg: f64) -> Point {
    let radians = map_bearing_deg(bearing_deg) * PI / 180.0;
    Point::new(radians.cos(), radians.sin())
}

/// End of an aim-line of `length` pixels starting at `start`.
#[must_use]
pub fn aim_endpoint(start: Point, bearing_deg: f64, length: f64) -> Point {
    let dir = aim_direction(bearing_deg);
    start.offset(dir.x * length, dir.y * length)
}
