//! Browser surface backed by a `CanvasRenderingContext2d`.
//!
//! This is the only module that touches `web_sys` drawing APIs. Map images are
//! decoded by the host page and registered by key before the first frame.

use std::collections::HashMap;
use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::camera::{Point, Rect};
use crate::maps::MapImage;
use crate::style::{Color, Stroke, TextPaint};
use crate::surface::{Surface, SurfaceError};

/// [`Surface`] over a 2D canvas context.
pub struct Canvas2dSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
}

impl Canvas2dSurface {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, images: HashMap::new() }
    }

    /// Acquire the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element refuses a `"2d"` context.
    pub fn for_canvas(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| SurfaceError::Backend("canvas has no 2d context".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::Backend("context is not CanvasRenderingContext2d".to_owned()))?;
        Ok(Self::new(ctx))
    }

    /// Register decoded pixels for a map image key.
    pub fn insert_image(&mut self, key: impl Into<String>, image: HtmlImageElement) {
        self.images.insert(key.into(), image);
    }

    fn set_font(&self, paint: &TextPaint) {
        self.ctx.set_font(&format!("{:.1}px sans-serif", paint.size));
    }
}

impl Surface for Canvas2dSurface {
    fn clear(&mut self, color: Color) {
        let canvas = self.ctx.canvas();
        let (w, h) = canvas.map_or((0.0, 0.0), |c| (f64::from(c.width()), f64::from(c.height())));
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_image(&mut self, image: &MapImage, src: Rect, dst: Rect) -> Result<(), SurfaceError> {
        let el = self
            .images
            .get(&image.key)
            .ok_or_else(|| SurfaceError::MissingImage(image.key.clone()))?;
        self.ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                el,
                src.left,
                src.top,
                src.width(),
                src.height(),
                dst.left,
                dst.top,
                dst.width(),
                dst.height(),
            )
            .map_err(js_err)
    }

    fn draw_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.ctx.begin_path();
        self.ctx.arc(center.x, center.y, radius, 0.0, 2.0 * PI).map_err(js_err)?;
        apply_stroke(&self.ctx, stroke);
        self.ctx.stroke();
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: &Stroke) -> Result<(), SurfaceError> {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        apply_stroke(&self.ctx, stroke);
        self.ctx.stroke();
        Ok(())
    }

    fn draw_text(&mut self, text: &str, at: Point, paint: &TextPaint) -> Result<(), SurfaceError> {
        self.set_font(paint);
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("alphabetic");
        match paint.outline {
            Some(width) => {
                self.ctx.set_stroke_style_str(&paint.color.to_css());
                self.ctx.set_line_width(width);
                self.ctx.stroke_text(text, at.x, at.y).map_err(js_err)
            }
            None => {
                self.ctx.set_fill_style_str(&paint.color.to_css());
                self.ctx.fill_text(text, at.x, at.y).map_err(js_err)
            }
        }
    }

    fn measure_text(&self, text: &str, paint: &TextPaint) -> f64 {
        self.set_font(paint);
        match self.ctx.measure_text(text) {
            Ok(m) => m.width(),
            Err(_) => 0.0,
        }
    }
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) {
    ctx.set_stroke_style_str(&stroke.color.to_css());
    ctx.set_line_width(stroke.width);
    ctx.set_line_cap("round");
}

fn js_err(e: JsValue) -> SurfaceError {
    SurfaceError::Backend(format!("{e:?}"))
}
