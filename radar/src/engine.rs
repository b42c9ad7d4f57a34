use std::sync::Arc;

use web_sys::HtmlCanvasElement;

use crate::camera::Size;
use crate::consts::{MAX_ZOOM, MIN_ZOOM};
use crate::maps::MapRegistry;
use crate::render::{self, FrameStats, SceneOutcome};
use crate::status::{StatusAnimation, StatusKind};
use crate::style::{Color, StyleSheet};
use crate::surface::{Surface, SurfaceError};
use crate::sync::StateSynchronizer;
use crate::web::Canvas2dSurface;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// What one call to [`EngineCore::render`] put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The canvas has no area; only the clear was issued.
    Empty,
    /// A status overlay replaced the map.
    Status(StatusKind),
    /// In game, but the snapshot lists no entities to follow.
    NoReference,
    /// The map scene was drawn.
    Drawn(FrameStats),
}

/// Core engine state: everything that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub registry: Arc<MapRegistry>,
    pub sync: Arc<StateSynchronizer>,
    style: Arc<StyleSheet>,
    zoom: f64,
    local_name: String,
    canvas: Size,
    status: StatusAnimation,
}

impl EngineCore {
    #[must_use]
    pub fn new(registry: Arc<MapRegistry>, sync: Arc<StateSynchronizer>) -> Self {
        Self {
            registry,
            sync,
            style: Arc::new(StyleSheet::default()),
            zoom: 1.0,
            local_name: String::new(),
            canvas: Size::new(0.0, 0.0),
            status: StatusAnimation::new(),
        }
    }

    // --- Settings ---

    /// Replace the style sheet with one built for `ui_scale`.
    ///
    /// The new sheet is fully built before the swap, so the next frame sees
    /// either the old sheet or the new one.
    pub fn set_ui_scale(&mut self, ui_scale: f64) {
        let sheet = Arc::new(StyleSheet::new(ui_scale));
        self.style = sheet;
    }

    /// Set the zoom level, clamped to `[MIN_ZOOM, MAX_ZOOM]`.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Name of the entity the view should follow.
    pub fn set_local_name(&mut self, name: impl Into<String>) {
        self.local_name = name.into();
    }

    /// Update the canvas size in pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.canvas = Size::new(width, height);
    }

    // --- Queries ---

    #[must_use]
    pub fn style(&self) -> Arc<StyleSheet> {
        Arc::clone(&self.style)
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.canvas
    }

    // --- Render ---

    /// Draw one frame. `now_ms` drives the status ellipsis.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S, now_ms: f64) -> FrameOutcome {
        surface.clear(Color::BLACK);
        if self.canvas.is_empty() {
            return FrameOutcome::Empty;
        }

        // One view and one sheet for the whole frame.
        let view = self.sync.view();
        let style = Arc::clone(&self.style);

        let in_game = view.snapshot.as_deref().filter(|s| s.in_game);
        let snapshot = match (StatusKind::for_state(view.state), in_game) {
            (None, Some(snapshot)) => snapshot,
            (status, _) => {
                let kind = status.unwrap_or(StatusKind::WaitingForRaid);
                let dots = self.status.tick(now_ms);
                if let Err(e) = render::draw_status(surface, kind, dots, self.canvas, &style) {
                    tracing::warn!(error = %e, "status draw failed");
                }
                return FrameOutcome::Status(kind);
            }
        };
        self.status.pause();

        match render::draw_scene(surface, &self.registry, snapshot, &self.local_name, self.canvas, self.zoom, &style) {
            SceneOutcome::NoReference => FrameOutcome::NoReference,
            SceneOutcome::Drawn(stats) => FrameOutcome::Drawn(stats),
        }
    }
}

/// The browser engine. Wraps `EngineCore` and owns the canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    surface: Canvas2dSurface,
    pub core: EngineCore,
}

impl Engine {
    /// Bind an engine to `canvas`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(
        canvas: HtmlCanvasElement,
        registry: Arc<MapRegistry>,
        sync: Arc<StateSynchronizer>,
    ) -> Result<Self, SurfaceError> {
        let surface = Canvas2dSurface::for_canvas(&canvas)?;
        let mut core = EngineCore::new(registry, sync);
        core.set_viewport(f64::from(canvas.width()), f64::from(canvas.height()));
        Ok(Self { canvas, surface, core })
    }

    /// Surface used for drawing; register decoded map images here.
    pub fn surface_mut(&mut self) -> &mut Canvas2dSurface {
        &mut self.surface
    }

    /// Draw the current state to the canvas, tracking the element's pixel size.
    pub fn render(&mut self) -> FrameOutcome {
        self.core
            .set_viewport(f64::from(self.canvas.width()), f64::from(self.canvas.height()));
        self.core.render(&mut self.surface, js_sys::Date::now())
    }
}
