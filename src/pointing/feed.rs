use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::pointing::{GeoPoint, ObjectPosition};

/// Altitude assumed for records that do not carry one.
pub const DEFAULT_HEIGHT_KM: f64 = 550.0;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed file not found: {0}")]
    FileNotFound(String),
    #[error("feed read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid feed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry of a position feed snapshot. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct ObjectRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub height_km: Option<f64>,
}

impl ObjectRecord {
    /// Resolves the record into a position, or `None` without both coordinates.
    pub fn into_position(self, default_height_km: f64) -> Option<ObjectPosition> {
        let (latitude, longitude) = (self.latitude?, self.longitude?);
        Some(ObjectPosition {
            name: self.name,
            point: GeoPoint::new(latitude, longitude),
            height_km: self.height_km.unwrap_or(default_height_km),
        })
    }
}

pub fn parse_records(json: &str) -> Result<Vec<ObjectRecord>, FeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Keeps the records with both coordinates, in input order.
pub fn ingest(records: Vec<ObjectRecord>, default_height_km: f64) -> Vec<ObjectPosition> {
    let total = records.len();
    let positions: Vec<_> = records
        .into_iter()
        .filter_map(|r| r.into_position(default_height_km))
        .collect();

    if positions.len() < total {
        log::debug!(
            "skipped {} records without coordinates",
            total - positions.len()
        );
    }
    positions
}

pub fn read_snapshot(path: &Path, default_height_km: f64) -> Result<Vec<ObjectPosition>, FeedError> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        if !path.exists() {
            return Err(FeedError::FileNotFound(path.display().to_string()));
        }
        fs::read_to_string(path)?
    };
    Ok(ingest(parse_records(&content)?, default_height_km))
}

/// File-backed snapshot of the position feed, reloaded on demand.
pub struct FeedLoader {
    path: PathBuf,
    default_height_km: f64,
    positions: Vec<ObjectPosition>,
    loaded_at: Option<DateTime<Utc>>,
}

impl FeedLoader {
    pub fn new(path: PathBuf, default_height_km: f64) -> Self {
        Self {
            path,
            default_height_km,
            positions: Vec::new(),
            loaded_at: None,
        }
    }

    pub fn load(&mut self) -> Result<usize, FeedError> {
        let positions = read_snapshot(&self.path, self.default_height_km)?;
        log::info!(
            "Loaded {} object positions from {}",
            positions.len(),
            self.path.display()
        );
        self.positions = positions;
        self.loaded_at = Some(Utc::now());
        Ok(self.positions.len())
    }

    /// Reload the snapshot; the previous positions survive a failed reload.
    pub fn reload(&mut self) -> Result<usize, FeedError> {
        self.load()
    }

    pub fn positions(&self) -> &[ObjectPosition] {
        &self.positions
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}
