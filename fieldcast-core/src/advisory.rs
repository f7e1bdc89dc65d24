//! Ordered advisory rules over current conditions. First match wins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::RawWeatherBundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    RainExpected,
    HotAndDry,
    HighUv,
    HighHumidity,
    IdealIrrigation,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::RainExpected => "Rain expected, avoid irrigation today",
            Advisory::HotAndDry => "Hot & dry, consider mulching or extra irrigation",
            Advisory::HighUv => "UV very high, limit outdoor work at midday",
            Advisory::HighHumidity => "High humidity, monitor for crop disease",
            Advisory::IdealIrrigation => "Ideal conditions for irrigation today",
        }
    }

    /// Decide from the current conditions of a fetched bundle.
    ///
    /// A missing UV reading counts as zero.
    pub fn for_bundle(bundle: &RawWeatherBundle) -> Self {
        let current = &bundle.current;
        decide(
            current.temperature_c,
            f64::from(current.humidity_pct),
            current.rain_mm(),
            bundle.uv_index.unwrap_or(0.0),
        )
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub fn decide(temperature_c: f64, humidity_pct: f64, rain_mm: f64, uv_index: f64) -> Advisory {
    if rain_mm > 2.0 {
        Advisory::RainExpected
    } else if temperature_c > 35.0 && humidity_pct < 30.0 {
        Advisory::HotAndDry
    } else if uv_index >= 8.0 {
        Advisory::HighUv
    } else if humidity_pct > 80.0 {
        Advisory::HighHumidity
    } else {
        Advisory::IdealIrrigation
    }
}
