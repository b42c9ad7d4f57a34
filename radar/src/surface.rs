//! The drawing surface contract the renderer paints onto.
//!
//! A host provides a [`Surface`]: clear, blit a map image crop, and stroke
//! circles, lines and text. [`RecordingSurface`] keeps the calls as
//! [`DrawCommand`]s for headless hosts and tests; the browser host uses
//! [`crate::web::Canvas2dSurface`].

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use crate::camera::{Point, Rect};
use crate::maps::MapImage;
use crate::style::{Color, Stroke, TextPaint};

/// Error raised by a surface backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    /// The backend has no pixels for this image key.
    #[error("map image {0} is not loaded")]
    MissingImage(String),
    /// The underlying drawing API rejected a call.
    #[error("surface backend error: {0}")]
    Backend(String),
}

/// Rendering-surface contract. Calls are issued in paint order.
pub trait Surface {
    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Color);

    /// Draw the `src` crop of `image` scaled into `dst`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the image is unavailable or the backend fails.
    fn draw_image(&mut self, image: &MapImage, src: Rect, dst: Rect) -> Result<(), SurfaceError>;

    /// Stroke a circle outline.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend fails.
    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) -> Result<(), SurfaceError>;

    /// Stroke a straight segment.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend fails.
    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), SurfaceError>;

    /// Draw a text run with its baseline starting at `at`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the backend fails.
    fn draw_text(&mut self, text: &str, at: Point, paint: &TextPaint) -> Result<(), SurfaceError>;

    /// Advance width of `text` in pixels.
    fn measure_text(&self, text: &str, paint: &TextPaint) -> f64;
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Image { key: String, src: Rect, dst: Rect },
    Circle { center: Point, radius: f64, stroke: Stroke },
    Line { from: Point, to: Point, stroke: Stroke },
    Text { text: String, at: Point, paint: TextPaint },
}

/// Surface that records calls instead of rasterizing.
///
/// `clear` starts a new frame and discards earlier commands. Text width is
/// estimated as `0.5 × size` per character.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the surface empty.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// All text runs recorded so far, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_image(&mut self, image: &MapImage, src: Rect, dst: Rect) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Image { key: image.key.clone(), src, dst });
        Ok(())
    }

    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Circle { center, radius, stroke: *stroke });
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Line { from, to, stroke: *stroke });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, at: Point, paint: &TextPaint) -> Result<(), SurfaceError> {
        self.commands.push(DrawCommand::Text { text: text.to_owned(), at, paint: *paint });
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn measure_text(&self, text: &str, paint: &TextPaint) -> f64 {
        text.chars().count() as f64 * paint.size * 0.5
    }
}
