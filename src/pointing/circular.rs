use crate::pointing::geometry::normalize_deg;

/// Mean of angles (degrees) by unit-vector summation, in [0, 360).
///
/// Returns `None` for an empty slice. Opposing angles whose vectors cancel
/// exactly still yield a value, taken from `atan2(0, 0)`.
pub fn circular_mean(angles_deg: &[f64]) -> Option<f64> {
    if angles_deg.is_empty() {
        return None;
    }

    let (sin_sum, cos_sum) = angles_deg.iter().fold((0.0, 0.0), |(s, c), angle| {
        let rad = angle.to_radians();
        (s + rad.sin(), c + rad.cos())
    });

    Some(normalize_deg(sin_sum.atan2(cos_sum).to_degrees()))
}

pub fn arithmetic_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
