//! Map registry: calibrated map bundles keyed by case-insensitive id.
//!
//! Bundles are built once at startup from `(calibration, image)` pairs handed
//! over by the asset loader and are read-only afterwards. Every id in a
//! calibration record aliases the same `Arc<MapBundle>`.

#[cfg(test)]
#[path = "maps_test.rs"]
mod maps_test;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MAP_ID;

/// Error returned while building a [`MapRegistry`].
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// No bundle claims the `default` id; there is nothing to fall back to.
    #[error("map registry has no \"default\" bundle")]
    MissingDefault,
    /// A calibration record lists no ids.
    #[error("map calibration for image {image} lists no ids")]
    NoIds { image: String },
    /// Origin or scale is NaN or infinite.
    #[error("map calibration for {id} has a non-finite origin or scale")]
    NonFinite { id: String },
    /// The paired image has a zero dimension.
    #[error("map image {image} has zero size")]
    EmptyImage { image: String },
    /// The calibration JSON could not be parsed.
    #[error("invalid map calibration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Linear calibration from world coordinates onto a map bitmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapCalibration {
    /// Ids this map answers to.
    #[serde(rename = "mapID")]
    pub ids: Vec<String>,
    /// Bitmap X of the world origin.
    pub x: f64,
    /// Bitmap Y of the world origin.
    pub y: f64,
    /// Bitmap pixels per world unit.
    pub scale: f64,
}

impl MapCalibration {
    /// Parse a calibration record from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Json`] for malformed input.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Handle to a decoded map bitmap. The surface resolves `key` to pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapImage {
    pub key: String,
    pub width: u32,
    pub height: u32,
}

impl MapImage {
    #[must_use]
    pub fn new(key: impl Into<String>, width: u32, height: u32) -> Self {
        Self { key: key.into(), width, height }
    }
}

/// A calibrated map image. Immutable once loaded.
#[derive(Debug)]
pub struct MapBundle {
    calibration: MapCalibration,
    image: MapImage,
}

impl MapBundle {
    /// Pair a calibration with its image.
    ///
    /// # Errors
    ///
    /// Rejects records with no ids, a non-finite origin or scale, or an image
    /// with a zero dimension.
    pub fn new(calibration: MapCalibration, image: MapImage) -> Result<Self, MapError> {
        let Some(first) = calibration.ids.first() else {
            return Err(MapError::NoIds { image: image.key });
        };
        if !(calibration.x.is_finite() && calibration.y.is_finite() && calibration.scale.is_finite()) {
            return Err(MapError::NonFinite { id: first.clone() });
        }
        if image.width == 0 || image.height == 0 {
            return Err(MapError::EmptyImage { image: image.key });
        }
        Ok(Self { calibration, image })
    }

    #[must_use]
    pub fn calibration(&self) -> &MapCalibration {
        &self.calibration
    }

    #[must_use]
    pub fn image(&self) -> &MapImage {
        &self.image
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.calibration.ids
    }

    /// Upper-cased display name of the first id, e.g. `CUSTOMS` for `bigmap`.
    #[must_use]
    pub fn name(&self) -> String {
        let first = self.calibration.ids.first().map_or("", String::as_str);
        display_name(first).unwrap_or(first).to_uppercase()
    }
}

/// Human-readable name for a known map id (case-insensitive).
#[must_use]
pub fn display_name(map_id: &str) -> Option<&'static str> {
    let name = match map_id.to_ascii_lowercase().as_str() {
        "woods" => "Woods",
        "shoreline" => "Shoreline",
        "rezervbase" => "Reserve",
        "laboratory" => "Labs",
        "interchange" => "Interchange",
        "factory4_day" | "factory4_night" => "Factory",
        "bigmap" => "Customs",
        "lighthouse" => "Lighthouse",
        "tarkovstreets" => "Streets",
        "sandbox" | "sandbox_high" => "Ground Zero",
        _ => return None,
    };
    Some(name)
}

/// Id → bundle lookup with a guaranteed default.
#[derive(Debug)]
pub struct MapRegistry {
    maps: HashMap<String, Arc<MapBundle>>,
    default: Arc<MapBundle>,
}

impl MapRegistry {
    /// Build the registry from every pair the asset loader yields.
    ///
    /// Later records win when two claim the same id.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MissingDefault`] when no record claims `default`,
    /// or a validation error for an unusable record.
    pub fn load<I>(source: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (MapCalibration, MapImage)>,
    {
        let mut maps = HashMap::new();
        for (calibration, image) in source {
            let bundle = Arc::new(MapBundle::new(calibration, image)?);
            for id in bundle.ids() {
                maps.insert(id.to_lowercase(), Arc::clone(&bundle));
            }
        }
        let default = maps.get(DEFAULT_MAP_ID).cloned().ok_or(MapError::MissingDefault)?;
        Ok(Self { maps, default })
    }

    /// Case-insensitive lookup; unknown ids resolve to the default bundle.
    #[must_use]
    pub fn resolve(&self, map_id: &str) -> &Arc<MapBundle> {
        self.maps.get(&map_id.to_lowercase()).unwrap_or(&self.default)
    }

    /// The fallback bundle.
    #[must_use]
    pub fn default_bundle(&self) -> &Arc<MapBundle> {
        &self.default
    }

    /// Number of distinct ids (aliases count separately).
    #[must_use]
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}
