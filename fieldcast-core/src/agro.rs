//! Client for the local crop-recommendation and market-price service.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Config;

/// Soil and climate readings the crop model is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    pub ph: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    recommended_crop: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub crop: String,
    pub market: String,
    pub price: f64,
}

#[derive(Debug, Deserialize)]
struct MarketPricesResponse {
    prices: Vec<MarketPrice>,
}

#[derive(Debug, Clone)]
pub struct AgroServiceClient {
    base_url: String,
    http: Client,
}

impl AgroServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.services.base_url.as_str())
    }

    /// Ask the model which crop suits `sample`.
    pub async fn recommend_crop(&self, sample: &SoilSample) -> Result<String> {
        let url = format!("{}/predict", self.base_url);
        debug!(%url, ?sample, "Requesting crop recommendation");

        let res = self
            .http
            .post(&url)
            .json(sample)
            .send()
            .await
            .with_context(|| format!("Failed to reach prediction service at {}", self.base_url))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Prediction service returned {}: {}",
                status,
                body.trim()
            ));
        }

        let parsed: PredictionResponse = res
            .json()
            .await
            .context("Failed to parse prediction response")?;

        Ok(parsed.recommended_crop)
    }

    pub async fn market_prices(&self, state: &str, district: &str) -> Result<Vec<MarketPrice>> {
        let url = format!("{}/market_prices", self.base_url);
        debug!(%url, state, district, "Requesting market prices");

        let res = self
            .http
            .get(&url)
            .query(&[("state", state), ("district", district)])
            .send()
            .await
            .with_context(|| format!("Failed to reach market service at {}", self.base_url))?;

        if !res.status().is_success() {
            return Err(anyhow!(
                "Market data not available for {district}, {state} (status {})",
                res.status()
            ));
        }

        let parsed: MarketPricesResponse = res
            .json()
            .await
            .context("Failed to parse market price response")?;

        Ok(parsed.prices)
    }
}
