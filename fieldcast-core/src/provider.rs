use crate::{
    Config,
    error::Result,
    model::{Coordinates, CurrentConditions, RawWeatherBundle},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};

pub mod openweather;

/// Source of current conditions, forecast and UV data.
///
/// Every fetch either returns a complete bundle or fails; partial results
/// are dropped.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions alone, looked up by city name.
    async fn current_by_city(&self, name: &str) -> Result<CurrentConditions>;

    async fn fetch_by_coordinates(&self, coords: Coordinates) -> Result<RawWeatherBundle>;

    async fn fetch_by_city_name(&self, name: &str) -> Result<RawWeatherBundle>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `fieldcast configure` and enter your API key."
        )
    })?;

    let mut provider = OpenWeatherProvider::new(api_key);

    if let Some(base_url) = &config.openweather.base_url {
        provider = provider.with_base_url(base_url.as_str());
    }

    if let Some(secs) = config.openweather.timeout_secs {
        provider = provider.with_timeout(Duration::from_secs(secs))?;
    }

    Ok(Box::new(provider))
}
