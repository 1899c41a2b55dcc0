mod pointing;
mod report;
mod web;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::pointing::feed::read_snapshot;
use crate::pointing::{Observer, DEFAULT_HEIGHT_KM, DEFAULT_MAX_RANGE_KM};
use crate::report::PointingReport;
use crate::web::Config;

#[derive(Parser)]
#[command(name = "sat-pointer")]
#[command(about = "Point an antenna at the densest cluster of nearby satellites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a pointing direction from a position snapshot
    Point {
        /// Observer location as "lat,lon"
        #[arg(long, required_unless_present = "config", allow_hyphen_values = true)]
        coordinates: Option<String>,
        /// Take the observer from a station config file instead
        #[arg(long, conflicts_with = "coordinates")]
        config: Option<String>,
        /// Observer ground elevation in metres (display only)
        #[arg(long)]
        ground_elevation_m: Option<f64>,
        /// JSON array of object positions, or "-" for stdin
        #[arg(long)]
        objects: PathBuf,
        #[arg(long, default_value_t = DEFAULT_MAX_RANGE_KM)]
        max_range_km: f64,
        /// Altitude for objects that do not report one
        #[arg(long, default_value_t = DEFAULT_HEIGHT_KM)]
        default_height_km: f64,
        /// List every object in range
        #[arg(long)]
        details: bool,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the pointing API
    Serve {
        #[arg(long)]
        config: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Point {
            coordinates,
            config,
            ground_elevation_m,
            objects,
            max_range_km,
            default_height_km,
            details,
            json,
        } => {
            let observer = match resolve_observer(coordinates, config, ground_elevation_m) {
                Ok(o) => o,
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            point(
                observer,
                &objects,
                max_range_km,
                default_height_km,
                details,
                json,
            )
        }
        Commands::Serve { config } => serve(&config),
    }
}

fn resolve_observer(
    coordinates: Option<String>,
    config: Option<String>,
    ground_elevation_m: Option<f64>,
) -> Result<Observer, String> {
    let observer = match (coordinates, config) {
        (Some(coordinates), _) => Observer::from_coordinates(&coordinates, ground_elevation_m)
            .ok_or_else(|| format!("Invalid coordinates: {}", coordinates))?,
        (None, Some(path)) => {
            let config =
                Config::from_file(&path).map_err(|e| format!("Error reading config: {}", e))?;
            let mut observer = config
                .station
                .observer()
                .map_err(|e| format!("Error reading config: {}", e))?;
            if let Some(elevation) = ground_elevation_m {
                observer.ground_elevation_m = elevation;
            }
            observer
        }
        (None, None) => return Err("Either --coordinates or --config is required".into()),
    };

    if !observer.location.is_valid() {
        return Err(format!(
            "Coordinates out of range: {}, {}",
            observer.location.latitude, observer.location.longitude
        ));
    }
    Ok(observer)
}

fn point(
    observer: Observer,
    objects_path: &Path,
    max_range_km: f64,
    default_height_km: f64,
    details: bool,
    json: bool,
) -> ExitCode {
    let checked = check_non_negative("--max-range-km", max_range_km)
        .and_then(|_| check_non_negative("--default-height-km", default_height_km));
    if let Err(e) = checked {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let objects = match read_snapshot(objects_path, default_height_km) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error reading objects: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Read {} object positions", objects.len());

    let report = match PointingReport::compute(observer, &objects, max_range_km) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Internal error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error encoding report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", report.text(details));
    }
    ExitCode::SUCCESS
}

fn check_non_negative(flag: &str, value: f64) -> Result<(), String> {
    if value.is_nan() || value < 0.0 {
        return Err(format!("{} must be non-negative, got {}", flag, value));
    }
    Ok(())
}

fn serve(path: &str) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
