use serde::Serialize;
use utoipa::ToSchema;

use crate::pointing::geometry::{great_circle_distance_km, initial_bearing_deg};
use crate::pointing::{AnnotatedObject, DirectionBin, GeoPoint, ObjectPosition};

pub const DEFAULT_MAX_RANGE_KM: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct BinCount {
    pub direction: DirectionBin,
    pub count: usize,
}

/// Per-bin object counts, kept in the order bins were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DensityTable {
    entries: Vec<BinCount>,
}

impl DensityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, direction: DirectionBin) {
        match self.entries.iter_mut().find(|e| e.direction == direction) {
            Some(entry) => entry.count += 1,
            None => self.entries.push(BinCount {
                direction,
                count: 1,
            }),
        }
    }

    pub fn count(&self, direction: DirectionBin) -> usize {
        self.entries
            .iter()
            .find(|e| e.direction == direction)
            .map_or(0, |e| e.count)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Bin with the highest count; ties go to the bin inserted first.
    pub fn most_common(&self) -> Option<BinCount> {
        self.entries
            .iter()
            .fold(None, |best: Option<&BinCount>, entry| match best {
                Some(b) if b.count >= entry.count => Some(b),
                _ => Some(entry),
            })
            .copied()
    }

    /// Counts for all 16 bins in compass order, zeros included.
    pub fn distribution(&self) -> Vec<BinCount> {
        DirectionBin::ALL
            .iter()
            .map(|&direction| BinCount {
                direction,
                count: self.count(direction),
            })
            .collect()
    }
}

/// Bins every object within `max_range_km` of the observer.
///
/// Annotated objects come back in input order.
pub fn aggregate(
    observer: &GeoPoint,
    objects: &[ObjectPosition],
    max_range_km: f64,
) -> (DensityTable, Vec<AnnotatedObject>) {
    let mut table = DensityTable::new();
    let mut annotated = Vec::new();

    for object in objects {
        let distance_km = great_circle_distance_km(observer, &object.point);
        if distance_km > max_range_km {
            continue;
        }

        let direction = DirectionBin::classify(initial_bearing_deg(observer, &object.point));
        table.increment(direction);
        annotated.push(AnnotatedObject {
            object: object.clone(),
            direction,
            distance_km,
        });
    }

    log::debug!(
        "{} of {} objects within {} km",
        table.total(),
        objects.len(),
        max_range_km
    );

    (table, annotated)
}
