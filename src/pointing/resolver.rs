use crate::pointing::circular::{arithmetic_mean, circular_mean};
use crate::pointing::density::DensityTable;
use crate::pointing::geometry::bearing_and_elevation;
use crate::pointing::{AnnotatedObject, DirectionBin, GeoPoint, PointingError, PointingResult};

/// Picks the densest bin and averages the exact pointing angles of its objects.
///
/// Azimuths are averaged on the circle, elevations arithmetically. The
/// returned direction is the classification of the mean azimuth, which can
/// land in a neighbour of the winning bin.
pub fn resolve_pointing(
    table: &DensityTable,
    annotated: &[AnnotatedObject],
    observer: &GeoPoint,
) -> Result<PointingResult, PointingError> {
    let winner = table.most_common().ok_or(PointingError::NoCandidates)?;
    log::debug!("densest bin {} with {} objects", winner.direction, winner.count);

    let (azimuths, elevations): (Vec<f64>, Vec<f64>) = annotated
        .iter()
        .filter(|a| a.direction == winner.direction)
        .map(|a| bearing_and_elevation(observer, &a.object.point, a.object.height_km))
        .unzip();

    let (Some(average_azimuth_deg), Some(average_elevation_deg)) =
        (circular_mean(&azimuths), arithmetic_mean(&elevations))
    else {
        return Err(PointingError::EmptyBinAfterFilter(winner.direction));
    };

    Ok(PointingResult {
        direction: DirectionBin::classify(average_azimuth_deg),
        count: winner.count,
        average_azimuth_deg,
        average_elevation_deg,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pointing::density::{aggregate, DEFAULT_MAX_RANGE_KM};
    use crate::pointing::ObjectPosition;

    const LONDON: GeoPoint = GeoPoint {
        latitude: 51.5074,
        longitude: -0.1278,
    };

    fn object(latitude: f64, longitude: f64, height_km: f64) -> ObjectPosition {
        ObjectPosition {
            name: None,
            point: GeoPoint::new(latitude, longitude),
            height_km,
        }
    }

    #[test]
    fn empty_table_has_no_candidates() {
        let (table, annotated) = aggregate(&LONDON, &[], DEFAULT_MAX_RANGE_KM);
        assert_eq!(
            resolve_pointing(&table, &annotated, &LONDON),
            Err(PointingError::NoCandidates)
        );
    }

    #[test]
    fn single_object_due_north() {
        let objects = [object(55.99, -0.1278, 550.0)];
        let (table, annotated) = aggregate(&LONDON, &objects, DEFAULT_MAX_RANGE_KM);
        let result = resolve_pointing(&table, &annotated, &LONDON).unwrap();

        assert_eq!(result.direction, DirectionBin::N);
        assert_eq!(result.count, 1);
        assert!(result.average_azimuth_deg < 1e-6 || result.average_azimuth_deg > 360.0 - 1e-6);
        assert!((result.average_elevation_deg - 47.7).abs() < 0.5);
    }

    #[test]
    fn opposite_bins_tie_on_insertion_order() {
        let north_first = [object(55.0, -0.1278, 550.0), object(48.0, -0.1278, 550.0)];
        let (table, annotated) = aggregate(&LONDON, &north_first, DEFAULT_MAX_RANGE_KM);
        let result = resolve_pointing(&table, &annotated, &LONDON).unwrap();
        assert_eq!(result.direction, DirectionBin::N);
        assert_eq!(result.count, 1);

        let south_first = [object(48.0, -0.1278, 550.0), object(55.0, -0.1278, 550.0)];
        let (table, annotated) = aggregate(&LONDON, &south_first, DEFAULT_MAX_RANGE_KM);
        let result = resolve_pointing(&table, &annotated, &LONDON).unwrap();
        assert_eq!(result.direction, DirectionBin::S);
    }

    #[test]
    fn densest_bin_wins_and_angles_are_averaged() {
        let objects = [
            object(48.0, -0.1278, 550.0),
            object(54.0, -0.5, 400.0),
            object(54.0, 0.25, 600.0),
        ];
        let (table, annotated) = aggregate(&LONDON, &objects, DEFAULT_MAX_RANGE_KM);
        let result = resolve_pointing(&table, &annotated, &LONDON).unwrap();

        assert_eq!(result.count, 2);
        assert_eq!(result.direction, DirectionBin::N);
        // one object slightly west of north, one slightly east
        let az = result.average_azimuth_deg;
        assert!(az < 5.0 || az > 355.0, "got {az}");

        let elevations: Vec<f64> = annotated
            .iter()
            .filter(|a| a.direction == DirectionBin::N)
            .map(|a| bearing_and_elevation(&LONDON, &a.object.point, a.object.height_km).1)
            .collect();
        let expected = (elevations[0] + elevations[1]) / 2.0;
        assert!((result.average_elevation_deg - expected).abs() < 1e-9);
    }

    #[test]
    fn inconsistent_inputs_are_surfaced() {
        let mut table = DensityTable::new();
        table.increment(DirectionBin::E);
        let err = resolve_pointing(&table, &[], &LONDON).unwrap_err();
        assert_eq!(err, PointingError::EmptyBinAfterFilter(DirectionBin::E));
        assert!(!err.is_informational());
    }
}
