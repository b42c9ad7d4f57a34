//! Radar overlay engine: projects live telemetry onto a calibrated map.
//!
//! The crate builds for both WebAssembly (the browser overlay) and native
//! hosts. The feed writes versioned world snapshots into a
//! [`sync::StateSynchronizer`]; each frame the engine reads one consistent
//! view, follows the reference entity, crops the map bitmap around it and
//! paints every visible entity onto a [`surface::Surface`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level browser engine and testable [`engine::EngineCore`] |
//! | [`sync`] | Connection state and the committed snapshot |
//! | [`maps`] | Calibrated map bundles keyed by id |
//! | [`camera`] | World → map → screen transforms and view computation |
//! | [`render`] | Scene and status drawing |
//! | [`status`] | Status overlay text and ellipsis animation |
//! | [`style`] | Scaled paint sheet |
//! | [`surface`] | Drawing surface trait and a recording implementation |
//! | [`web`] | Canvas 2D surface |
//! | [`consts`] | Shared numeric constants (zoom limits, marker sizes, etc.) |

pub mod camera;
pub mod consts;
pub mod engine;
pub mod maps;
pub mod render;
pub mod status;
pub mod style;
pub mod surface;
pub mod sync;
pub mod web;
