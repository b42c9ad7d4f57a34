//! Rendering: turns one committed snapshot into surface draw calls.
//!
//! This module only reads state. It receives the snapshot, the registry and a
//! style sheet and issues primitives on a [`Surface`]; it never mutates
//! application state.
//!
//! Failure isolation is per entity: a transform that yields non-finite
//! coordinates or a surface call that fails abandons that entity only, and the
//! frame carries on with the rest.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use telemetry::{EntitySnapshot, WorldSnapshot};

use crate::camera::{Point, Rect, Size, ViewParameters, aim_endpoint, compute_view_parameters, map_to_screen, world_to_map};
use crate::maps::MapRegistry;
use crate::status::StatusKind;
use crate::style::{StyleKey, StyleSheet};
use crate::surface::{Surface, SurfaceError};

/// Why a single entity could not be drawn.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The entity's numbers produced a NaN or infinite coordinate.
    #[error("entity {name:?} produced non-finite coordinates")]
    NonFinite { name: String },
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Per-frame entity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// The map crop reached the surface.
    pub map_drawn: bool,
    pub drawn: usize,
    pub culled: usize,
    pub failed: usize,
    /// Exfiltrated entities, never drawn.
    pub skipped: usize,
}

/// Outcome of drawing the map scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOutcome {
    /// The snapshot has no entities to follow.
    NoReference,
    Drawn(FrameStats),
}

enum EntityDraw {
    Drawn,
    Culled,
}

/// Index of the reference entity: first case-insensitive name match, else the
/// first entity, else none.
#[must_use]
pub fn select_reference(players: &[EntitySnapshot], local_name: &str) -> Option<usize> {
    let wanted = local_name.to_lowercase();
    players
        .iter()
        .position(|p| p.name.to_lowercase() == wanted)
        .or(if players.is_empty() { None } else { Some(0) })
}

/// Draw a centered status message.
///
/// The message is positioned using the width of its one-dot variant so the
/// animated ellipsis grows to the right without shifting the text.
///
/// # Errors
///
/// Returns `Err` if the surface rejects the text call.
pub fn draw_status<S: Surface + ?Sized>(
    surface: &mut S,
    kind: StatusKind,
    dots: u8,
    canvas: Size,
    style: &StyleSheet,
) -> Result<(), SurfaceError> {
    let anchor_w = surface.measure_text(&kind.anchor_text(), &style.status_text);
    let at = Point::new(canvas.width / 2.0 - anchor_w / 2.0, canvas.height / 2.0);
    surface.draw_text(&kind.text(dots), at, &style.status_text)
}

/// Draw the map and every visible entity for `snapshot`.
///
/// The view follows the reference entity. The reference is drawn first, then
/// the others in snapshot order.
pub fn draw_scene<S: Surface + ?Sized>(
    surface: &mut S,
    registry: &MapRegistry,
    snapshot: &WorldSnapshot,
    local_name: &str,
    canvas: Size,
    zoom: f64,
    style: &StyleSheet,
) -> SceneOutcome {
    let bundle = registry.resolve(&snapshot.map_id);
    let Some(ref_idx) = select_reference(&snapshot.players, local_name) else {
        return SceneOutcome::NoReference;
    };
    let reference = &snapshot.players[ref_idx];

    let follow = world_to_map(reference.position, bundle).point();
    let view = compute_view_parameters(canvas, bundle, follow, zoom);

    let mut stats = FrameStats::default();
    match surface.draw_image(view.map.image(), view.bounds, canvas.rect()) {
        Ok(()) => stats.map_drawn = true,
        Err(e) => tracing::warn!(error = %e, map = %view.map.name(), "map blit failed"),
    }

    let cull = canvas.rect().inflate(style.cull_margin);
    let order = std::iter::once(ref_idx).chain((0..snapshot.players.len()).filter(|&i| i != ref_idx));
    for idx in order {
        let entity = &snapshot.players[idx];
        if entity.is_exfiltrated() {
            stats.skipped += 1;
            continue;
        }
        let ctx = EntityContext { view: &view, cull, style, reference, is_reference: idx == ref_idx };
        match draw_entity(surface, entity, &ctx) {
            Ok(EntityDraw::Drawn) => stats.drawn += 1,
            Ok(EntityDraw::Culled) => stats.culled += 1,
            Err(e) => {
                stats.failed += 1;
                tracing::debug!(error = %e, entity = %entity.name, "entity draw abandoned");
            }
        }
    }

    SceneOutcome::Drawn(stats)
}

struct EntityContext<'a> {
    view: &'a ViewParameters,
    /// Canvas rectangle grown by the cull margin.
    cull: Rect,
    style: &'a StyleSheet,
    reference: &'a EntitySnapshot,
    is_reference: bool,
}

fn draw_entity<S: Surface + ?Sized>(
    surface: &mut S,
    entity: &EntitySnapshot,
    ctx: &EntityContext<'_>,
) -> Result<EntityDraw, RenderError> {
    let non_finite = || RenderError::NonFinite { name: entity.name.clone() };

    let screen = map_to_screen(world_to_map(entity.position, &ctx.view.map).point(), ctx.view);
    if !screen.is_finite() {
        return Err(non_finite());
    }
    if !ctx.cull.contains(screen) {
        return Ok(EntityDraw::Culled);
    }

    if !entity.is_alive {
        draw_death_marker(surface, screen, ctx.style)?;
        return Ok(EntityDraw::Drawn);
    }

    let aim_end = aim_endpoint(screen, f64::from(entity.bearing_deg()), ctx.style.aimline_length(ctx.is_reference));
    if !aim_end.is_finite() {
        return Err(non_finite());
    }

    let label = if ctx.is_reference {
        None
    } else {
        let height = entity.position.y - ctx.reference.position.y;
        let dist = ctx.reference.position.distance(entity.position);
        if !(height.is_finite() && dist.is_finite()) {
            return Err(non_finite());
        }
        Some([entity.name.clone(), format!("H: {} D: {}", round_label(height), round_label(dist))])
    };

    let key = StyleKey::for_entity(entity.category, ctx.is_reference);
    draw_marker(surface, screen, aim_end, key, ctx.style)?;
    if let Some(lines) = label {
        draw_label(surface, screen, &lines, key, ctx.style)?;
    }
    Ok(EntityDraw::Drawn)
}

/// Circle plus aim-line, each over a dark outline.
fn draw_marker<S: Surface + ?Sized>(
    surface: &mut S,
    at: Point,
    aim_end: Point,
    key: StyleKey,
    style: &StyleSheet,
) -> Result<(), SurfaceError> {
    let paint = &style.entity(key).marker;
    surface.draw_circle(at, style.marker_radius, &style.shape_outline)?;
    surface.draw_circle(at, style.marker_radius, paint)?;
    surface.draw_line(at, aim_end, &style.shape_outline)?;
    surface.draw_line(at, aim_end, paint)
}

/// Two crossing diagonals centered on `at`.
fn draw_death_marker<S: Surface + ?Sized>(surface: &mut S, at: Point, style: &StyleSheet) -> Result<(), SurfaceError> {
    let l = style.death_marker_half;
    surface.draw_line(at.offset(-l, l), at.offset(l, -l), &style.death_marker)?;
    surface.draw_line(at.offset(-l, -l), at.offset(l, l), &style.death_marker)
}

/// Label lines below-right of the marker; outline pass then fill pass per line.
fn draw_label<S: Surface + ?Sized>(
    surface: &mut S,
    marker: Point,
    lines: &[String],
    key: StyleKey,
    style: &StyleSheet,
) -> Result<(), SurfaceError> {
    let fill = &style.entity(key).label;
    let mut at = marker.offset(style.label_offset.x, style.label_offset.y);
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        surface.draw_text(line, at, &style.text_outline)?;
        surface.draw_text(line, at, fill)?;
        at = at.offset(0.0, style.label_line_height);
    }
    Ok(())
}

/// Round half to even, as the label format expects.
#[allow(clippy::cast_possible_truncation)]
fn round_label(value: f32) -> i64 {
    f64::from(value).round_ties_even() as i64
}
