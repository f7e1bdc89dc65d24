//! Core library for the `fieldcast` farm weather dashboard.
//!
//! This crate defines:
//! - Location resolution (geolocation, city lookup, fallback)
//! - The OpenWeather fetcher that assembles current, forecast and UV data
//! - Forecast normalization into a 7-day outlook
//! - The irrigation/field-work advisory rules
//! - Configuration and a client for the local crop/market service
//!
//! It is used by `fieldcast-cli`, but can also be reused by other binaries or services.

pub mod advisory;
pub mod agro;
pub mod config;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod provider;
pub mod report;

pub use advisory::{Advisory, decide};
pub use agro::{AgroServiceClient, MarketPrice, SoilSample};
pub use config::Config;
pub use error::{SubRequest, WeatherError};
pub use forecast::normalize;
pub use location::{DisabledGeolocator, Geolocator, IpGeolocator, LocationResolver};
pub use model::{
    Coordinates, CurrentConditions, DailyForecastEntry, ForecastFeed, ForecastSample, IconKind,
    RawWeatherBundle,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use report::{LocationRequest, WeatherReport, build_report};
