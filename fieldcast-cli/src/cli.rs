use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use fieldcast_core::{
    AgroServiceClient, Config, Coordinates, LocationRequest, LocationResolver, SoilSample,
    build_report, provider_from_config,
};
use inquire::{Confirm, CustomType, Password};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "fieldcast", version, about = "Farm weather dashboard")]
pub struct Cli {
    /// Log debug output (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeather API key and fallback location.
    Configure,

    /// Show current conditions, advisory and the 7-day forecast.
    ///
    /// Without --city or --lat/--lon the location is detected, or the
    /// configured fallback is used.
    Show {
        /// City name, e.g. "Nagpur" or "Nagpur,IN".
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Ask the local model which crop suits a soil sample.
    Predict {
        /// Nitrogen content.
        #[arg(long)]
        nitrogen: f64,
        /// Phosphorus content.
        #[arg(long)]
        phosphorus: f64,
        /// Potassium content.
        #[arg(long)]
        potassium: f64,
        #[arg(long)]
        ph: f64,
        /// Temperature in °C.
        #[arg(long, allow_negative_numbers = true)]
        temperature: f64,
        /// Relative humidity in %.
        #[arg(long)]
        humidity: f64,
        /// Rainfall in mm.
        #[arg(long)]
        rainfall: f64,
    },

    /// List crop prices for a district.
    Market {
        #[arg(long)]
        state: String,
        #[arg(long)]
        district: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, lat, lon, json } => {
                let request = match (city, lat, lon) {
                    (Some(city), _, _) => LocationRequest::City(city.trim().to_string()),
                    (None, Some(lat), Some(lon)) => {
                        LocationRequest::Coordinates(Coordinates::new(lat, lon)?)
                    }
                    _ => LocationRequest::Auto,
                };
                show(request, json).await
            }
            Command::Predict {
                nitrogen,
                phosphorus,
                potassium,
                ph,
                temperature,
                humidity,
                rainfall,
            } => {
                let sample = SoilSample {
                    nitrogen,
                    phosphorus,
                    potassium,
                    ph,
                    temperature,
                    humidity,
                    rainfall,
                };
                let client = AgroServiceClient::from_config(&Config::load()?);
                let crop = client.recommend_crop(&sample).await?;
                println!("Recommended crop: {crop}");
                Ok(())
            }
            Command::Market { state, district } => {
                let client = AgroServiceClient::from_config(&Config::load()?);
                let prices = client.market_prices(state.trim(), district.trim()).await?;
                render::print_market_prices(&prices);
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let detect = Confirm::new("Detect location from your IP address?")
        .with_default(config.location.detect)
        .prompt()?;
    config.location.detect = detect;

    let latitude = CustomType::<f64>::new("Fallback latitude:")
        .with_default(config.location.fallback_latitude)
        .prompt()?;
    let longitude = CustomType::<f64>::new("Fallback longitude:")
        .with_default(config.location.fallback_longitude)
        .prompt()?;
    config.set_fallback_coordinates(Coordinates::new(latitude, longitude)?);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(request: LocationRequest, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?.with_env_overrides();
    let provider = provider_from_config(&config)?;
    let resolver = LocationResolver::from_config(&config)?;
    let today = Local::now().weekday();

    let report = match build_report(&resolver, provider.as_ref(), &request, today).await {
        Ok(report) => report,
        // Startup-style lookups degrade to sample content; explicit searches report the error.
        Err(e) if request == LocationRequest::Auto && e.is_fetch_failure() => {
            tracing::warn!(error = %e, "Falling back to placeholder weather");
            eprintln!("Could not load live weather: {e}");
            if json {
                render::print_placeholder_json()?;
            } else {
                render::print_placeholder();
            }
            return Ok(());
        }
        Err(e) => {
            let target = match &request {
                LocationRequest::City(name) => format!("'{name}'"),
                LocationRequest::Coordinates(c) => format!("({}, {})", c.latitude, c.longitude),
                LocationRequest::Auto => "your location".to_string(),
            };
            return Err(e).with_context(|| format!("Could not load weather for {target}"));
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render::print_report(&report);
    }

    Ok(())
}
