use crate::pointing::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Azimuth reported when observer and target coincide.
pub const OVERHEAD_AZIMUTH_DEG: f64 = 0.0;

/// Haversine surface distance between two points, in kilometres.
pub fn great_circle_distance_km(p1: &GeoPoint, p2: &GeoPoint) -> f64 {
    let lat1 = p1.lat_rad();
    let lat2 = p2.lat_rad();
    let delta_lat = (p2.latitude - p1.latitude).to_radians();
    let delta_lon = (p2.longitude - p1.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial great-circle bearing from `from` to `to`, normalized into [0, 360).
pub fn initial_bearing_deg(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.lat_rad();
    let lat2 = to.lat_rad();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let x = delta_lon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    normalize_deg(x.atan2(y).to_degrees())
}

/// Azimuth and elevation (degrees) from the observer to an object at `height_km`.
///
/// Elevation uses a flat right triangle: the object's altitude over the
/// surface distance. Earth curvature is ignored. When the two points
/// coincide the object is straight overhead and the azimuth is
/// [`OVERHEAD_AZIMUTH_DEG`].
pub fn bearing_and_elevation(observer: &GeoPoint, target: &GeoPoint, height_km: f64) -> (f64, f64) {
    let distance_km = great_circle_distance_km(observer, target);
    if distance_km == 0.0 {
        return (OVERHEAD_AZIMUTH_DEG, 90.0);
    }

    let azimuth = initial_bearing_deg(observer, target);
    let elevation = (height_km * 1000.0).atan2(distance_km * 1000.0).to_degrees();
    (azimuth, elevation)
}

pub fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
