use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::pointing::{
    aggregate, resolve_pointing, AnnotatedObject, BinCount, ObjectPosition, Observer,
    PointingError, PointingResult,
};

/// Everything one pointing run produces, for the console and the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PointingReport {
    pub computed_at: DateTime<Utc>,
    pub observer: Observer,
    pub max_range_km: f64,
    pub result: Option<PointingResult>,
    pub distribution: Vec<BinCount>,
    pub objects: Vec<AnnotatedObject>,
}

impl PointingReport {
    /// Runs aggregation and resolution. `NoCandidates` leaves `result` empty;
    /// an internal inconsistency is returned as an error.
    pub fn compute(
        observer: Observer,
        objects: &[ObjectPosition],
        max_range_km: f64,
    ) -> Result<Self, PointingError> {
        let (table, annotated) = aggregate(&observer.location, objects, max_range_km);

        let result = match resolve_pointing(&table, &annotated, &observer.location) {
            Ok(result) => Some(result),
            Err(e) if e.is_informational() => None,
            Err(e) => return Err(e),
        };

        Ok(Self {
            computed_at: Utc::now(),
            observer,
            max_range_km,
            result,
            distribution: table.distribution(),
            objects: annotated,
        })
    }

    /// Console rendering; `details` adds the per-object listing.
    pub fn text(&self, details: bool) -> ReportText<'_> {
        ReportText {
            report: self,
            details,
        }
    }
}

pub struct ReportText<'a> {
    report: &'a PointingReport,
    details: bool,
}

impl fmt::Display for ReportText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let location = report.observer.location;

        writeln!(
            f,
            "Observer at {:.4}, {:.4} ({:.0} m above sea level)",
            location.latitude, location.longitude, report.observer.ground_elevation_m
        )?;
        writeln!(
            f,
            "{} objects within {:.0} km",
            report.objects.len(),
            report.max_range_km
        )?;

        let Some(result) = &report.result else {
            return writeln!(f, "No objects found within range");
        };

        writeln!(f, "\nDistribution:")?;
        for bin in &report.distribution {
            writeln!(
                f,
                "  {:<4}{:>6.1}°{:>5}  {}",
                bin.direction.to_string(),
                bin.direction.center_deg(),
                bin.count,
                "#".repeat(bin.count)
            )?;
        }

        if self.details {
            writeln!(f, "\nObjects:")?;
            for (i, annotated) in report.objects.iter().enumerate() {
                let object = &annotated.object;
                writeln!(
                    f,
                    "  {:>3}: {:<24} {:>8.3} {:>9.3} {:>7.1} km alt  {:>7.1} km  {}",
                    i + 1,
                    object.name.as_deref().unwrap_or("-"),
                    object.point.latitude,
                    object.point.longitude,
                    object.height_km,
                    annotated.distance_km,
                    annotated.direction
                )?;
            }
        }

        writeln!(
            f,
            "\nPoint {} (azimuth {:.1}°, elevation {:.1}°), {} objects in the densest sector",
            result.direction, result.average_azimuth_deg, result.average_elevation_deg, result.count
        )
    }
}
