use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::pointing::geometry::normalize_deg;

pub const SECTOR_WIDTH_DEG: f64 = 360.0 / 16.0;

/// One 22.5° sector of the 16-point compass rose, centered on its bearing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize, ToSchema,
)]
#[allow(clippy::upper_case_acronyms)]
pub enum DirectionBin {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl DirectionBin {
    /// All bins in compass order, starting at north.
    pub const ALL: [DirectionBin; 16] = [
        DirectionBin::N,
        DirectionBin::NNE,
        DirectionBin::NE,
        DirectionBin::ENE,
        DirectionBin::E,
        DirectionBin::ESE,
        DirectionBin::SE,
        DirectionBin::SSE,
        DirectionBin::S,
        DirectionBin::SSW,
        DirectionBin::SW,
        DirectionBin::WSW,
        DirectionBin::W,
        DirectionBin::WNW,
        DirectionBin::NW,
        DirectionBin::NNW,
    ];

    /// Maps an azimuth to its bin.
    ///
    /// Halves round away from zero, so each sector is closed at its lower
    /// edge: 11.25° is NNE and 348.75° is N. Inputs outside [0, 360) are
    /// wrapped first.
    pub fn classify(azimuth_deg: f64) -> DirectionBin {
        let index = (normalize_deg(azimuth_deg) / SECTOR_WIDTH_DEG).round() as usize % 16;
        Self::ALL[index]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn center_deg(self) -> f64 {
        self.index() as f64 * SECTOR_WIDTH_DEG
    }
}
