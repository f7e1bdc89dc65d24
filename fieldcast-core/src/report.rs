//! One fetch-render cycle: resolve a location, fetch, then derive the forecast and advisory.

use chrono::Weekday;
use serde::Serialize;
use tracing::debug;

use crate::{
    advisory::Advisory,
    error::Result,
    forecast::{normalize, round_half_up},
    location::LocationResolver,
    model::{Coordinates, DailyForecastEntry, RawWeatherBundle},
    provider::WeatherProvider,
};

/// Where the user wants weather for.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationRequest {
    /// Detected position, or the fallback.
    Auto,
    City(String),
    Coordinates(Coordinates),
}

/// Current conditions as displayed: whole degrees, compass wind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentSummary {
    pub location_name: String,
    pub temperature_c: i32,
    pub feels_like_c: i32,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: Option<f64>,
    pub wind_direction: Option<&'static str>,
    pub rain_mm: f64,
    pub uv_index: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub coordinates: Coordinates,
    pub current: CurrentSummary,
    pub advisory: Advisory,
    pub advisory_message: &'static str,
    pub forecast: Vec<DailyForecastEntry>,
}

impl WeatherReport {
    pub fn from_bundle(bundle: &RawWeatherBundle, today: Weekday) -> Self {
        let current = &bundle.current;
        let advisory = Advisory::for_bundle(bundle);

        Self {
            coordinates: current.coordinates,
            current: CurrentSummary {
                location_name: current.location_name.clone(),
                temperature_c: round_half_up(current.temperature_c),
                feels_like_c: round_half_up(current.feels_like_c),
                description: current.description.clone(),
                humidity_pct: current.humidity_pct,
                wind_speed_mps: current.wind.map(|w| w.speed_mps),
                wind_direction: current.wind.and_then(|w| w.compass()),
                rain_mm: current.rain_mm(),
                uv_index: bundle.uv_index,
            },
            advisory,
            advisory_message: advisory.message(),
            forecast: normalize(&bundle.forecast, today),
        }
    }
}

/// Fetch the bundle for `request` and build its report.
///
/// `Auto` never fails on location; fetch errors propagate untouched.
pub async fn build_report(
    resolver: &LocationResolver,
    provider: &dyn WeatherProvider,
    request: &LocationRequest,
    today: Weekday,
) -> Result<WeatherReport> {
    let bundle = match request {
        LocationRequest::Auto => {
            let coords = resolver.resolve().await;
            provider.fetch_by_coordinates(coords).await?
        }
        LocationRequest::City(name) => provider.fetch_by_city_name(name).await?,
        LocationRequest::Coordinates(coords) => provider.fetch_by_coordinates(*coords).await?,
    };

    debug!(
        location = %bundle.current.location_name,
        samples = bundle.forecast.len(),
        "Fetched weather bundle"
    );

    Ok(WeatherReport::from_bundle(&bundle, today))
}
