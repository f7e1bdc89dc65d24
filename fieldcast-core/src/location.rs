//! Location resolution: device geolocation, explicit city lookup, or a fixed fallback.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    Config,
    error::{Result, WeatherError},
    model::Coordinates,
    provider::WeatherProvider,
};

pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";

/// Platform source of the current position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    /// Fails with [`WeatherError::LocationUnavailable`] when no position can be had.
    async fn locate(&self) -> Result<Coordinates>;
}

/// Geolocation turned off; always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeolocator;

#[async_trait]
impl Geolocator for DisabledGeolocator {
    async fn locate(&self) -> Result<Coordinates> {
        Err(WeatherError::LocationUnavailable(
            "geolocation is disabled".to_string(),
        ))
    }
}

/// Approximate position from the public IP address.
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

impl Default for IpGeolocator {
    fn default() -> Self {
        Self::new(DEFAULT_GEOLOCATION_URL)
    }
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates> {
        let unavailable = WeatherError::LocationUnavailable;

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| unavailable(format!("geolocation request failed: {e}")))?;

        if !res.status().is_success() {
            return Err(unavailable(format!(
                "geolocation service returned {}",
                res.status()
            )));
        }

        let body: IpApiResponse = res
            .json()
            .await
            .map_err(|e| unavailable(format!("unreadable geolocation response: {e}")))?;

        match (body.status.as_str(), body.lat, body.lon) {
            ("success", Some(lat), Some(lon)) => {
                Coordinates::new(lat, lon).map_err(|e| unavailable(e.to_string()))
            }
            _ => Err(unavailable(
                body.message
                    .unwrap_or_else(|| "geolocation service gave no position".to_string()),
            )),
        }
    }
}

#[derive(Debug)]
pub struct LocationResolver {
    geolocator: Box<dyn Geolocator>,
    fallback: Coordinates,
}

impl LocationResolver {
    pub fn new(geolocator: Box<dyn Geolocator>, fallback: Coordinates) -> Self {
        Self {
            geolocator,
            fallback,
        }
    }

    /// IP geolocation when `location.detect` is on, otherwise straight to the fallback.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fallback = config.fallback_coordinates()?;

        let geolocator: Box<dyn Geolocator> = if config.location.detect {
            match &config.location.geolocation_url {
                Some(url) => Box::new(IpGeolocator::new(url.as_str())),
                None => Box::new(IpGeolocator::default()),
            }
        } else {
            Box::new(DisabledGeolocator)
        };

        Ok(Self::new(geolocator, fallback))
    }

    pub fn fallback(&self) -> Coordinates {
        self.fallback
    }

    /// Never fails: any geolocation error resolves to the fallback.
    pub async fn resolve(&self) -> Coordinates {
        match self.geolocator.locate().await {
            Ok(coords) => {
                info!(lat = coords.latitude, lon = coords.longitude, "Detected location");
                coords
            }
            Err(e) => {
                warn!(error = %e, "Using fallback location");
                self.fallback
            }
        }
    }

    /// Coordinates of a named place, taken from its current-conditions lookup.
    pub async fn resolve_from_city_name(
        &self,
        provider: &dyn WeatherProvider,
        name: &str,
    ) -> Result<Coordinates> {
        provider
            .current_by_city(name)
            .await
            .map(|current| current.coordinates)
            .map_err(|e| e.into_lookup(name))
    }
}
