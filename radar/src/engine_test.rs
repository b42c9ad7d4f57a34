#![allow(clippy::float_cmp)]

use telemetry::{EntityCategory, EntitySnapshot, Vec2, Vec3, WorldSnapshot};

use super::*;
use crate::maps::{MapCalibration, MapImage};
use crate::surface::{DrawCommand, RecordingSurface};
use crate::sync::ConnectionState;

// =============================================================
// Helpers
// =============================================================

fn registry() -> Arc<MapRegistry> {
    let records = vec![
        (
            MapCalibration { ids: vec!["default".into()], x: 0.0, y: 0.0, scale: 1.0 },
            MapImage::new("default.png", 800, 600),
        ),
        (
            MapCalibration { ids: vec!["Woods".into()], x: 400.0, y: 300.0, scale: 0.5 },
            MapImage::new("woods.png", 800, 600),
        ),
    ];
    Arc::new(MapRegistry::load(records).unwrap())
}

fn core() -> EngineCore {
    let mut core = EngineCore::new(registry(), Arc::new(StateSynchronizer::new()));
    core.set_viewport(800.0, 600.0);
    core
}

fn connect(core: &EngineCore) {
    core.sync.set_state(ConnectionState::Connecting).unwrap();
    core.sync.set_state(ConnectionState::Connected).unwrap();
}

fn player(name: &str, category: EntityCategory) -> EntitySnapshot {
    EntitySnapshot {
        name: name.into(),
        category,
        is_active: true,
        is_alive: true,
        position: Vec3::new(0.0, 0.0, 0.0),
        rotation: Vec2::new(0.0, 0.0),
    }
}

fn snapshot(version: u32, in_game: bool, players: Vec<EntitySnapshot>) -> WorldSnapshot {
    WorldSnapshot { version, in_game, map_id: "woods".into(), players }
}

// =============================================================
// Defaults and settings
// =============================================================

#[test]
fn core_defaults() {
    let core = EngineCore::new(registry(), Arc::new(StateSynchronizer::new()));
    assert_eq!(core.zoom(), 1.0);
    assert_eq!(core.local_name(), "");
    assert!(core.viewport().is_empty());
    assert_eq!(*core.style(), StyleSheet::default());
}

#[test]
fn set_zoom_clamps() {
    let mut core = core();
    core.set_zoom(5.0);
    assert_eq!(core.zoom(), MAX_ZOOM);
    core.set_zoom(0.0);
    assert_eq!(core.zoom(), MIN_ZOOM);
    core.set_zoom(1.25);
    assert_eq!(core.zoom(), 1.25);
}

#[test]
fn set_zoom_ignores_non_finite() {
    let mut core = core();
    core.set_zoom(1.5);
    core.set_zoom(f64::NAN);
    assert_eq!(core.zoom(), 1.5);
}

#[test]
fn set_ui_scale_swaps_sheet() {
    let mut core = core();
    let before = core.style();
    core.set_ui_scale(2.0);
    let after = core.style();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.ui_scale, 1.0);
    assert_eq!(after.ui_scale, 2.0);
    assert_eq!(after.marker_radius, 12.0);
}

#[test]
fn set_local_name_stores_name() {
    let mut core = core();
    core.set_local_name("Dusk");
    assert_eq!(core.local_name(), "Dusk");
}

// =============================================================
// Frame outcomes
// =============================================================

#[test]
fn empty_viewport_only_clears() {
    let mut core = core();
    core.set_viewport(0.0, 600.0);
    let mut surface = RecordingSurface::new();
    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::Empty);
    assert_eq!(surface.commands(), &[DrawCommand::Clear(Color::BLACK)]);
}

#[test]
fn disconnected_shows_not_connected() {
    let mut core = core();
    let mut surface = RecordingSurface::new();
    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::Status(StatusKind::NotConnected));
    assert_eq!(surface.texts(), vec!["Not Connected!"]);
}

#[test]
fn connecting_shows_animated_status() {
    let mut core = core();
    core.sync.set_state(ConnectionState::Connecting).unwrap();
    let mut surface = RecordingSurface::new();

    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::Status(StatusKind::Connecting));
    assert_eq!(surface.texts(), vec!["Connecting."]);
    core.render(&mut surface, 1_000.0);
    assert_eq!(surface.texts(), vec!["Connecting.."]);
    core.render(&mut surface, 2_000.0);
    assert_eq!(surface.texts(), vec!["Connecting..."]);
    core.render(&mut surface, 3_000.0);
    assert_eq!(surface.texts(), vec!["Connecting."]);
}

#[test]
fn reconnecting_shows_status_even_with_snapshot() {
    let mut core = core();
    connect(&core);
    core.sync.apply(snapshot(1, true, vec![player("me", EntityCategory::Local)]));
    core.sync.set_state(ConnectionState::Reconnecting).unwrap();
    let mut surface = RecordingSurface::new();
    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::Status(StatusKind::Reconnecting));
    assert_eq!(surface.texts(), vec!["Re-Connecting."]);
}

#[test]
fn connected_without_snapshot_waits_for_raid() {
    let mut core = core();
    connect(&core);
    let mut surface = RecordingSurface::new();
    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::Status(StatusKind::WaitingForRaid));
    assert_eq!(surface.texts(), vec!["Waiting for Raid Start."]);
}

#[test]
fn connected_out_of_game_waits_for_raid() {
    let mut core = core();
    connect(&core);
    core.sync.apply(snapshot(1, false, vec![player("me", EntityCategory::Local)]));
    let mut surface = RecordingSurface::new();
    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::Status(StatusKind::WaitingForRaid));
}

#[test]
fn in_game_with_no_players_has_no_reference() {
    let mut core = core();
    connect(&core);
    core.sync.apply(snapshot(1, true, Vec::new()));
    let mut surface = RecordingSurface::new();
    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::NoReference);
    assert_eq!(surface.commands(), &[DrawCommand::Clear(Color::BLACK)]);
}

#[test]
fn in_game_draws_scene() {
    let mut core = core();
    core.set_local_name("me");
    connect(&core);
    core.sync.apply(snapshot(
        1,
        true,
        vec![player("bob", EntityCategory::Hostile), player("me", EntityCategory::Local)],
    ));
    let mut surface = RecordingSurface::new();
    let FrameOutcome::Drawn(stats) = core.render(&mut surface, 0.0) else {
        panic!("expected a drawn frame");
    };
    assert!(stats.map_drawn);
    assert_eq!(stats.drawn, 2);
    assert_eq!(surface.commands()[0], DrawCommand::Clear(Color::BLACK));
    assert!(matches!(&surface.commands()[1], DrawCommand::Image { key, .. } if key == "woods.png"));
}

#[test]
fn each_frame_starts_clean() {
    let mut core = core();
    connect(&core);
    core.sync.apply(snapshot(1, true, vec![player("me", EntityCategory::Local)]));
    let mut surface = RecordingSurface::new();
    core.render(&mut surface, 0.0);
    let first = surface.commands().len();
    core.render(&mut surface, 16.0);
    assert_eq!(surface.commands().len(), first);
}

#[test]
fn ui_scale_applies_to_next_frame() {
    let mut core = core();
    connect(&core);
    core.sync.apply(snapshot(1, true, vec![player("me", EntityCategory::Local)]));
    core.set_ui_scale(2.0);
    let mut surface = RecordingSurface::new();
    core.render(&mut surface, 0.0);
    let radius = surface.commands().iter().find_map(|c| match c {
        DrawCommand::Circle { radius, .. } => Some(*radius),
        _ => None,
    });
    assert_eq!(radius, Some(12.0));
}

#[test]
fn disconnect_drops_back_to_status() {
    let mut core = core();
    connect(&core);
    core.sync.apply(snapshot(1, true, vec![player("me", EntityCategory::Local)]));
    core.sync.set_state(ConnectionState::Disconnected).unwrap();
    let mut surface = RecordingSurface::new();
    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::Status(StatusKind::NotConnected));
}

#[test]
fn status_ellipsis_does_not_jump_after_scene() {
    let mut core = core();
    core.set_local_name("me");
    connect(&core);
    let mut surface = RecordingSurface::new();
    assert_eq!(core.render(&mut surface, 0.0), FrameOutcome::Status(StatusKind::WaitingForRaid));

    core.sync.apply(snapshot(1, true, vec![player("me", EntityCategory::Local)]));
    assert!(matches!(core.render(&mut surface, 500.0), FrameOutcome::Drawn(_)));

    core.sync.apply(snapshot(2, false, Vec::new()));
    core.render(&mut surface, 5_000.0);
    assert_eq!(surface.texts(), vec!["Waiting for Raid Start."]);
}
