mod clock;
mod config;
mod doppler;
mod predict;
mod report;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

use crate::clock::{resolve_time, Clock, SystemClock, TimeError};
use crate::config::{Config, ConfigError};
use crate::doppler::{observed_frequency, DopplerError, DopplerQuery};
use crate::predict::{
    relative_state, CatalogProvider, CatalogSource, ElementSource, Observer, PredictError,
};
use crate::report::Report;

#[derive(Parser, Debug)]
#[command(name = "sat-doppler")]
#[command(about = "Range speed and Doppler shift of a satellite seen from a ground observer")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Catalog name of the satellite, e.g. "ISS (ZARYA)", or its NORAD number
    satellite: String,
    /// Observer latitude (degrees)
    latitude: f64,
    /// Observer longitude (degrees)
    longitude: f64,
    /// Transmit frequency in MHz to compute the Doppler shift for (must be positive)
    freq_mhz: Option<f64>,
    /// UTC time of observation (default: now)
    #[arg(short, long)]
    time: Option<String>,
    /// Observer altitude above the WGS-84 ellipsoid (m)
    #[arg(long)]
    altitude: Option<f64>,
    /// Read element sets from a local TLE file instead of the catalog URL
    #[arg(long, conflicts_with = "catalog_url")]
    tle_file: Option<PathBuf>,
    /// Catalog URL to download element sets from
    #[arg(long)]
    catalog_url: Option<String>,
    /// Download the catalog even if the cached copy is recent
    #[arg(long)]
    refresh: bool,
    /// Use the signed range rate for the Doppler shift instead of the range speed
    #[arg(long)]
    radial: bool,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Time(#[from] TimeError),
    #[error("{0}")]
    Predict(#[from] PredictError),
    #[error("{0}")]
    Doppler(#[from] DopplerError),
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match run(&cli, &SystemClock) {
        Ok(report) => {
            let output = if cli.json {
                report.render_json().map_err(AppError::from)
            } else {
                Ok(report.render_text())
            };
            match output {
                Ok(text) => {
                    println!("{}", text);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, clock: &dyn Clock) -> Result<Report, AppError> {
    let config = Config::load(cli.config.as_deref())?;
    let timestamp = resolve_time(cli.time.as_deref(), clock)?;
    let observer = Observer::new(
        cli.latitude,
        cli.longitude,
        cli.altitude.unwrap_or(config.observer.altitude_m),
    )?;

    let source = match (&cli.tle_file, &cli.catalog_url) {
        (Some(path), _) => CatalogSource::File(path.clone()),
        (None, Some(url)) => CatalogSource::Url(url.clone()),
        (None, None) => CatalogSource::Url(config.catalog.url.clone()),
    };
    let mut provider = CatalogProvider::new(
        source,
        config.catalog.cache_dir.clone(),
        config.catalog.max_age,
    )
    .force_refresh(cli.refresh);

    observe(&mut provider, &cli.satellite, &observer, timestamp, cli.freq_mhz, cli.radial)
}

/// Propagate one satellite and run the Doppler calculation for it.
fn observe(
    source: &mut dyn ElementSource,
    satellite: &str,
    observer: &Observer,
    timestamp: chrono::DateTime<chrono::Utc>,
    freq_mhz: Option<f64>,
    radial: bool,
) -> Result<Report, AppError> {
    let entry = source.element_set(satellite)?;
    let state = relative_state(&entry, observer, timestamp)?;
    log::info!(
        "{} at {}: range {:.1} km, elevation {:.1} deg",
        entry.name,
        state.timestamp,
        state.range_km(),
        state.elevation_deg
    );
    if state.elevation_deg < 0.0 {
        log::warn!("{} is below the horizon at {}", entry.name, state.timestamp);
    }

    let result = DopplerQuery {
        velocity_km_s: state.velocity_km_s,
        transmit_mhz: if radial { None } else { freq_mhz },
    }
    .compute()?;

    let range_rate_km_s = radial.then(|| state.range_rate_km_s());
    let observed_mhz = match range_rate_km_s {
        // Closing speed is positive while approaching
        Some(rate) => freq_mhz.map(|f| observed_frequency(-rate, f)).transpose()?,
        None => result.observed_mhz,
    };

    Ok(Report {
        satellite: entry.name,
        norad_id: entry.norad_id,
        timestamp: state.timestamp,
        range_km: state.range_km(),
        elevation_deg: state.elevation_deg,
        range_speed_km_s: result.range_speed_km_s,
        range_rate_km_s,
        transmit_mhz: freq_mhz,
        observed_mhz,
    })
}
