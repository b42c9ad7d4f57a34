//! Map asset directory loading.
//!
//! Each `*.json` file in the directory is one calibration record. Besides the
//! calibration fields it names the paired image and that image's pixel size:
//!
//! ```json
//! { "mapID": ["bigmap"], "x": 1180.5, "y": 1030.2, "scale": 2.4,
//!   "image": "customs.jpg", "width": 4096, "height": 3072 }
//! ```
//!
//! `image` defaults to the record's file name with a `.jpg` extension. Pixels
//! are decoded by whichever surface draws them; the host only needs the size.

#[cfg(test)]
#[path = "assets_test.rs"]
mod assets_test;

use std::fs;
use std::path::{Path, PathBuf};

use radar::maps::{MapCalibration, MapError, MapImage, MapRegistry};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid map record {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Map(#[from] MapError),
}

#[derive(Debug, Deserialize)]
struct MapRecord {
    #[serde(flatten)]
    calibration: MapCalibration,
    image: Option<String>,
    width: u32,
    height: u32,
}

/// Parse one record. `file_name` supplies the default image key.
///
/// # Errors
///
/// Returns the `serde_json` error for malformed input.
pub fn parse_record(json: &str, file_name: &str) -> Result<(MapCalibration, MapImage), serde_json::Error> {
    let record: MapRecord = serde_json::from_str(json)?;
    let key = record.image.unwrap_or_else(|| default_image_key(file_name));
    Ok((record.calibration, MapImage::new(key, record.width, record.height)))
}

fn default_image_key(file_name: &str) -> String {
    let stem = Path::new(file_name).file_stem().map_or(file_name.into(), |s| s.to_string_lossy());
    format!("{stem}.jpg")
}

/// Build a registry from every record in `dir`, in file-name order.
///
/// # Errors
///
/// Fails on unreadable files, malformed records, or a registry without a
/// `default` map.
pub fn load_registry(dir: &Path) -> Result<MapRegistry, AssetError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| AssetError::Io { path, source }
    };

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_err(dir))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")))
        .collect();
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        let json = fs::read_to_string(&path).map_err(io_err(&path))?;
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let record = parse_record(&json, &file_name).map_err(|source| AssetError::Parse { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), image = %record.1.key, "map record loaded");
        records.push(record);
    }

    let count = records.len();
    let registry = MapRegistry::load(records)?;
    tracing::info!(records = count, ids = registry.len(), dir = %dir.display(), "map registry loaded");
    Ok(registry)
}
