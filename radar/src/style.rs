//! Paint styles, computed as one immutable sheet per UI scale.
//!
//! A UI-scale change builds a fresh [`StyleSheet`] and the engine swaps its
//! `Arc` in one assignment; no frame ever sees a half-rescaled sheet.

#[cfg(test)]
#[path = "style_test.rs"]
mod style_test;

use telemetry::EntityCategory;

use crate::camera::Point;
use crate::consts::{
    AIMLINE_LONG_PX, AIMLINE_SHORT_PX, CULL_MARGIN_PX, DEATH_MARKER_HALF_PX, LABEL_LINE_HEIGHT_PX, LABEL_OFFSET_X_PX,
    LABEL_OFFSET_Y_PX, LABEL_TEXT_PX, MARKER_RADIUS_PX, MAX_UI_SCALE, MIN_UI_SCALE, SHAPE_OUTLINE_EXTRA_PX,
    STATUS_TEXT_PX, STROKE_WIDTH_PX, TEXT_OUTLINE_WIDTH_PX,
};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const RED: Self = Self::rgb(0xFF, 0x00, 0x00);
    pub const GREEN: Self = Self::rgb(0x00, 0x80, 0x00);
    pub const LIME_GREEN: Self = Self::rgb(0x32, 0xCD, 0x32);
    pub const YELLOW: Self = Self::rgb(0xFF, 0xFF, 0x00);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// CSS `rgba()` string for Canvas2D style setters.
    #[must_use]
    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, f64::from(self.a) / 255.0)
    }
}

/// Line/outline paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Text paint. `outline` texts are stroked, the rest filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPaint {
    pub color: Color,
    pub size: f64,
    /// Stroke width for outline passes; `None` means a fill pass.
    pub outline: Option<f64>,
}

/// Marker and label paints for one class of entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityStyle {
    pub marker: Stroke,
    pub label: TextPaint,
}

/// Closed set of entity looks. The reference entity always uses [`StyleKey::Reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    Reference,
    Teammate,
    Hostile,
    HostileScav,
    Bot,
}

impl StyleKey {
    const COUNT: usize = 5;

    /// Style for an entity. Non-reference `Local` entities share the teammate look.
    #[must_use]
    pub fn for_entity(category: EntityCategory, is_reference: bool) -> Self {
        if is_reference {
            return Self::Reference;
        }
        match category {
            EntityCategory::Local | EntityCategory::Teammate => Self::Teammate,
            EntityCategory::Hostile => Self::Hostile,
            EntityCategory::HostileScav => Self::HostileScav,
            EntityCategory::Bot => Self::Bot,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Reference => 0,
            Self::Teammate => 1,
            Self::Hostile => 2,
            Self::HostileScav => 3,
            Self::Bot => 4,
        }
    }

    fn color(self) -> Color {
        match self {
            Self::Reference => Color::GREEN,
            Self::Teammate => Color::LIME_GREEN,
            Self::Hostile => Color::RED,
            Self::HostileScav => Color::WHITE,
            Self::Bot => Color::YELLOW,
        }
    }

    const ALL: [Self; Self::COUNT] = [Self::Reference, Self::Teammate, Self::Hostile, Self::HostileScav, Self::Bot];
}

/// Every size and paint the renderer needs, pre-multiplied by UI scale.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    pub ui_scale: f64,
    entities: [EntityStyle; StyleKey::COUNT],
    /// Dark outline under marker strokes; width = marker stroke + extra.
    pub shape_outline: Stroke,
    pub death_marker: Stroke,
    pub death_marker_half: f64,
    pub text_outline: TextPaint,
    pub status_text: TextPaint,
    pub marker_radius: f64,
    pub aimline_short: f64,
    pub aimline_long: f64,
    pub label_offset: Point,
    pub label_line_height: f64,
    pub cull_margin: f64,
}

impl StyleSheet {
    /// Build the sheet for `ui_scale`, clamped to `[MIN_UI_SCALE, MAX_UI_SCALE]`.
    /// Non-finite input falls back to unit scale.
    #[must_use]
    pub fn new(ui_scale: f64) -> Self {
        let s = if ui_scale.is_finite() { ui_scale.clamp(MIN_UI_SCALE, MAX_UI_SCALE) } else { 1.0 };
        let stroke_width = STROKE_WIDTH_PX * s;

        let entities = StyleKey::ALL.map(|key| EntityStyle {
            marker: Stroke { color: key.color(), width: stroke_width },
            label: TextPaint { color: key.color(), size: LABEL_TEXT_PX * s, outline: None },
        });

        Self {
            ui_scale: s,
            entities,
            shape_outline: Stroke { color: Color::BLACK, width: stroke_width + SHAPE_OUTLINE_EXTRA_PX * s },
            death_marker: Stroke { color: Color::BLACK, width: stroke_width },
            death_marker_half: DEATH_MARKER_HALF_PX * s,
            text_outline: TextPaint {
                color: Color::BLACK,
                size: LABEL_TEXT_PX * s,
                outline: Some(TEXT_OUTLINE_WIDTH_PX * s),
            },
            status_text: TextPaint { color: Color::RED, size: STATUS_TEXT_PX * s, outline: None },
            marker_radius: MARKER_RADIUS_PX * s,
            aimline_short: AIMLINE_SHORT_PX * s,
            aimline_long: AIMLINE_LONG_PX * s,
            label_offset: Point::new(LABEL_OFFSET_X_PX * s, LABEL_OFFSET_Y_PX * s),
            label_line_height: LABEL_LINE_HEIGHT_PX * s,
            cull_margin: CULL_MARGIN_PX * s,
        }
    }

    #[must_use]
    pub fn entity(&self, key: StyleKey) -> &EntityStyle {
        &self.entities[key.index()]
    }

    /// Aim-line length for an entity.
    #[must_use]
    pub fn aimline_length(&self, is_reference: bool) -> f64 {
        if is_reference { self.aimline_long } else { self.aimline_short }
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::new(1.0)
    }
}
