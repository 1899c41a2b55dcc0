use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::pointing::DirectionBin;

/// A point on the Earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn lat_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    /// Checks the nominal latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Ground projection of an orbiting object plus its altitude.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ObjectPosition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub point: GeoPoint,
    pub height_km: f64,
}

/// An in-range object tagged with its compass bin and surface distance.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AnnotatedObject {
    pub object: ObjectPosition,
    pub direction: DirectionBin,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PointingResult {
    pub direction: DirectionBin,
    pub count: usize,
    pub average_azimuth_deg: f64,
    pub average_elevation_deg: f64,
}

/// Where the antenna sits. Ground elevation is carried for display only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Observer {
    pub location: GeoPoint,
    pub ground_elevation_m: f64,
}

impl Observer {
    pub fn new(location: GeoPoint, ground_elevation_m: f64) -> Self {
        Self {
            location,
            ground_elevation_m,
        }
    }

    pub fn from_coordinates(coordinates: &str, ground_elevation_m: Option<f64>) -> Option<Self> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return None;
        }
        let lat = parts[0].parse().ok()?;
        let lon = parts[1].parse().ok()?;
        Some(Self {
            location: GeoPoint::new(lat, lon),
            ground_elevation_m: ground_elevation_m.unwrap_or(0.0),
        })
    }
}
