//! Wall persistence: a single JSON file holding the current wall layout,
//! plus an export/import format for moving layouts between maps.
//!
//! Loading is forgiving (a missing or malformed file is an empty layout with
//! a warning); saving and exporting report their errors. The stored record
//! carries a millisecond timestamp, the export adds a human-readable date.
#![forbid(unsafe_code)]

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use gloam_geom::Vec2;
use gloam_map::{Wall, WallId};
use gloam_session::WallStore;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct VertexRec {
    x: f32,
    y: f32,
}

#[derive(Serialize, Deserialize)]
struct WallRec {
    id: u64,
    vertices: Vec<VertexRec>,
}

/// On-disk shape of the wall file.
#[derive(Serialize, Deserialize)]
struct WallsRecord {
    walls: Vec<WallRec>,
    /// Unix milliseconds at save time.
    timestamp: i64,
}

/// Export shape: the stored record plus an RFC 3339 date.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportRecord {
    walls: Vec<WallRec>,
    timestamp: i64,
    export_date: String,
}

fn to_recs(walls: &[Wall]) -> Vec<WallRec> {
    walls
        .iter()
        .map(|w| WallRec {
            id: w.id.0,
            vertices: w
                .vertices
                .iter()
                .map(|v| VertexRec { x: v.x, y: v.y })
                .collect(),
        })
        .collect()
}

fn from_recs(recs: Vec<WallRec>) -> Vec<Wall> {
    recs.into_iter()
        .map(|r| Wall {
            id: WallId(r.id),
            vertices: r
                .vertices
                .into_iter()
                .map(|v| Vec2::new(v.x, v.y))
                .collect(),
        })
        .collect()
}

/// Read the wall layout at `path`. A missing file is a fresh layout; a file
/// that fails to parse is treated the same way so a corrupt save never
/// blocks startup.
pub fn load_walls(path: &Path) -> Vec<Wall> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            log::warn!("failed to read walls from {}: {}", path.display(), e);
            return Vec::new();
        }
    };
    match serde_json::from_str::<WallsRecord>(&text) {
        Ok(rec) => {
            log::info!("loaded {} walls from {}", rec.walls.len(), path.display());
            from_recs(rec.walls)
        }
        Err(e) => {
            log::warn!("malformed wall file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Write the full wall layout to `path`, replacing any previous save.
pub fn save_walls(path: &Path, walls: &[Wall]) -> Result<(), Box<dyn Error>> {
    let rec = WallsRecord {
        walls: to_recs(walls),
        timestamp: Utc::now().timestamp_millis(),
    };
    fs::write(path, serde_json::to_string(&rec)?)?;
    log::debug!("saved {} walls to {}", walls.len(), path.display());
    Ok(())
}

/// Remove the wall file. A file that was never written is not an error.
pub fn clear_walls(path: &Path) -> Result<(), Box<dyn Error>> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Serialize the layout for sharing. Pretty-printed, with the save timestamp
/// and an RFC 3339 export date alongside the walls.
pub fn export_walls(walls: &[Wall]) -> Result<String, Box<dyn Error>> {
    let rec = ExportRecord {
        walls: to_recs(walls),
        timestamp: Utc::now().timestamp_millis(),
        export_date: Utc::now().to_rfc3339(),
    };
    Ok(serde_json::to_string_pretty(&rec)?)
}

/// Parse a previously exported layout. The document must carry a `walls`
/// array; anything else is rejected rather than silently read as empty.
pub fn import_walls(json: &str) -> Result<Vec<Wall>, Box<dyn Error>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let walls = value
        .get("walls")
        .ok_or("import document has no \"walls\" field")?;
    if !walls.is_array() {
        return Err("import document \"walls\" field is not an array".into());
    }
    let recs: Vec<WallRec> = serde_json::from_value(walls.clone())?;
    Ok(from_recs(recs))
}

/// Size and shape of the current save, for the status display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageStats {
    pub wall_count: usize,
    pub vertex_count: usize,
    pub bytes: u64,
    /// Save time in unix milliseconds.
    pub timestamp: i64,
}

pub fn storage_stats(path: &Path) -> Option<StorageStats> {
    let bytes = fs::metadata(path).ok()?.len();
    let rec: WallsRecord = serde_json::from_str(&fs::read_to_string(path).ok()?).ok()?;
    Some(StorageStats {
        wall_count: rec.walls.len(),
        vertex_count: rec.walls.iter().map(|w| w.vertices.len()).sum(),
        bytes,
        timestamp: rec.timestamp,
    })
}

/// File-backed [`WallStore`]. Session-side saves are best effort; a failed
/// write is logged and the in-memory layout stays authoritative.
pub struct JsonWallStore {
    path: PathBuf,
}

impl JsonWallStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WallStore for JsonWallStore {
    fn save(&mut self, walls: &[Wall]) {
        if let Err(e) = save_walls(&self.path, walls) {
            log::error!("wall save to {} failed: {}", self.path.display(), e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = clear_walls(&self.path) {
            log::error!("wall clear at {} failed: {}", self.path.display(), e);
        }
    }
}
