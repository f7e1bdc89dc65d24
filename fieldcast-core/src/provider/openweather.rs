use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{Result, SubRequest, WeatherError},
    model::{
        Coordinates, CurrentConditions, ForecastFeed, ForecastSample, Precipitation,
        RawWeatherBundle, Wind,
    },
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

/// How a location is addressed in a current/forecast request.
#[derive(Debug, Clone, Copy)]
enum Query<'a> {
    Coordinates(Coordinates),
    City(&'a str),
}

impl Query<'_> {
    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Query::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
            Query::City(name) => vec![("q", name.to_string())],
        }
    }
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at another API root, e.g. a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the HTTP client with one that enforces a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    async fn get(
        &self,
        request: SubRequest,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<String> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%request, %url, "Requesting OpenWeather data");

        let fetch_err = |status, reason: String| WeatherError::WeatherFetch {
            request,
            status,
            reason,
        };

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| fetch_err(None, format!("failed to send request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| fetch_err(Some(status), format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(fetch_err(
                Some(status),
                format!("status {}: {}", status, truncate_body(&body)),
            ));
        }

        Ok(body)
    }

    async fn fetch_current(&self, query: Query<'_>) -> Result<CurrentConditions> {
        let mut params = query.params();
        params.push(("units", "metric".to_string()));

        let body = self.get(SubRequest::Current, "weather", &params).await?;
        let parsed: OwCurrentResponse = parse(SubRequest::Current, &body)?;
        parsed.into_conditions()
    }

    async fn fetch_forecast(&self, query: Query<'_>) -> Result<ForecastFeed> {
        let mut params = query.params();
        params.push(("units", "metric".to_string()));

        let body = self.get(SubRequest::Forecast, "forecast", &params).await?;
        let parsed: OwForecastResponse = parse(SubRequest::Forecast, &body)?;

        parsed
            .list
            .into_iter()
            .map(OwForecastEntry::into_sample)
            .collect()
    }

    async fn fetch_uv(&self, coords: Coordinates) -> Result<Option<f64>> {
        let params = Query::Coordinates(coords).params();

        let body = self.get(SubRequest::UvIndex, "uvi", &params).await?;
        let parsed: OwUvResponse = parse(SubRequest::UvIndex, &body)?;

        Ok(parsed.value)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_by_city(&self, name: &str) -> Result<CurrentConditions> {
        self.fetch_current(Query::City(name)).await
    }

    async fn fetch_by_coordinates(&self, coords: Coordinates) -> Result<RawWeatherBundle> {
        let query = Query::Coordinates(coords);

        let (current, forecast, uv_index) = tokio::try_join!(
            self.fetch_current(query),
            self.fetch_forecast(query),
            self.fetch_uv(coords)
        )?;

        Ok(RawWeatherBundle { current, forecast, uv_index })
    }

    async fn fetch_by_city_name(&self, name: &str) -> Result<RawWeatherBundle> {
        let query = Query::City(name);

        // UV needs coordinates, which only the current-conditions answer carries.
        let current_then_uv = async {
            let current = self.fetch_current(query).await?;
            let uv_index = self.fetch_uv(current.coordinates).await?;
            Ok::<_, WeatherError>((current, uv_index))
        };

        let ((current, uv_index), forecast) =
            tokio::try_join!(current_then_uv, self.fetch_forecast(query))
                .map_err(|e| e.into_lookup(name))?;

        Ok(RawWeatherBundle { current, forecast, uv_index })
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    rain: Option<OwRain>,
}

impl OwCurrentResponse {
    fn into_conditions(self) -> Result<CurrentConditions> {
        let coordinates = Coordinates::new(self.coord.lat, self.coord.lon)
            .map_err(|e| malformed(SubRequest::Current, e.to_string()))?;

        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| malformed(SubRequest::Current, "no weather condition".into()))?;

        Ok(CurrentConditions {
            location_name: self.name,
            coordinates,
            temperature_c: self.main.temp,
            feels_like_c: self.main.feels_like,
            condition: weather.main,
            description: weather.description,
            humidity_pct: self.main.humidity,
            wind: self.wind.map(|w| Wind {
                speed_mps: w.speed,
                direction_deg: w.deg,
            }),
            rain: self.rain.map(|r| Precipitation {
                last_1h_mm: r.one_hour,
                last_3h_mm: r.three_hour,
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

impl OwForecastEntry {
    fn into_sample(self) -> Result<ForecastSample> {
        let timestamp = DateTime::from_timestamp(self.dt, 0).ok_or_else(|| {
            malformed(SubRequest::Forecast, format!("timestamp {} out of range", self.dt))
        })?;

        let weather = self.weather.into_iter().next().ok_or_else(|| {
            malformed(SubRequest::Forecast, format!("no weather condition at {}", self.dt_txt))
        })?;

        Ok(ForecastSample {
            timestamp,
            date_text: self.dt_txt,
            temperature_c: self.main.temp,
            condition: weather.main,
            description: weather.description,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwUvResponse {
    value: Option<f64>,
}

fn parse<T: DeserializeOwned>(request: SubRequest, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| malformed(request, e.to_string()))
}

fn malformed(request: SubRequest, reason: String) -> WeatherError {
    WeatherError::MalformedResponse { request, reason }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
