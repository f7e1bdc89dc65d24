use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

/// Fallback location used when nothing better is known (New Delhi).
pub const FALLBACK_COORDINATES: Coordinates = Coordinates {
    latitude: 28.6139,
    longitude: 77.2090,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(WeatherError::InvalidCoordinates { latitude, longitude });
        }

        Ok(Self { latitude, longitude })
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        FALLBACK_COORDINATES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mps: f64,
    pub direction_deg: Option<f64>,
}

impl Wind {
    /// 16-point compass direction, e.g. "NNE".
    pub fn compass(&self) -> Option<&'static str> {
        const POINTS: [&str; 16] = [
            "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
            "NW", "NNW",
        ];

        let deg = self.direction_deg?;
        let idx = (deg / 22.5 + 0.5).floor().rem_euclid(16.0) as usize;
        Some(POINTS[idx])
    }
}

/// Accumulated precipitation reported with current conditions, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Precipitation {
    pub last_1h_mm: Option<f64>,
    pub last_3h_mm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub coordinates: Coordinates,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    /// Primary condition group, e.g. "Rain".
    pub condition: String,
    pub description: String,
    pub humidity_pct: u8,
    pub wind: Option<Wind>,
    pub rain: Option<Precipitation>,
}

impl CurrentConditions {
    /// Rain in mm: the last hour when it is positive, else the last three hours.
    pub fn rain_mm(&self) -> f64 {
        let Some(rain) = self.rain else {
            return 0.0;
        };

        rain.last_1h_mm
            .filter(|mm| *mm > 0.0)
            .or(rain.last_3h_mm)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    /// Slot time as UTC text, "YYYY-MM-DD HH:MM:SS". Not shifted to the location's zone.
    pub date_text: String,
    pub temperature_c: f64,
    pub condition: String,
    pub description: String,
}

impl ForecastSample {
    /// The "YYYY-MM-DD" part of the date text.
    pub fn calendar_date(&self) -> &str {
        self.date_text
            .split_once(' ')
            .map_or(self.date_text.as_str(), |(date, _)| date)
    }
}

/// 3-hour samples in the order the provider delivered them.
pub type ForecastFeed = Vec<ForecastSample>;

/// Everything one fetch cycle produces. Never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWeatherBundle {
    pub current: CurrentConditions,
    pub forecast: ForecastFeed,
    pub uv_index: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Sun,
    Cloud,
    Rain,
}

impl IconKind {
    pub fn from_condition(condition: &str) -> Self {
        match condition {
            "Clear" => IconKind::Sun,
            "Clouds" | "Snow" | "Mist" | "Fog" => IconKind::Cloud,
            "Rain" | "Drizzle" | "Thunderstorm" => IconKind::Rain,
            _ => IconKind::Sun,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub day_label: String,
    pub temperature_c: i32,
    pub condition: String,
    pub icon: IconKind,
    pub tooltip: String,
}
