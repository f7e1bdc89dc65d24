use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// The individual upstream calls that make up one weather fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubRequest {
    Current,
    Forecast,
    UvIndex,
}

impl SubRequest {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubRequest::Current => "current conditions",
            SubRequest::Forecast => "forecast",
            SubRequest::UvIndex => "uv index",
        }
    }
}

impl fmt::Display for SubRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Location '{0}' could not be resolved to coordinates")]
    Lookup(String),

    #[error("Weather {request} request failed: {reason}")]
    WeatherFetch {
        request: SubRequest,
        status: Option<StatusCode>,
        reason: String,
    },

    #[error("Weather {request} response was malformed: {reason}")]
    MalformedResponse { request: SubRequest, reason: String },

    #[error("Invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

impl WeatherError {
    /// Fetch and decode failures are handled the same way by callers.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            WeatherError::WeatherFetch { .. } | WeatherError::MalformedResponse { .. }
        )
    }

    /// The sub-request that failed, if this error came from a fetch.
    pub fn sub_request(&self) -> Option<SubRequest> {
        match self {
            WeatherError::WeatherFetch { request, .. }
            | WeatherError::MalformedResponse { request, .. } => Some(*request),
            _ => None,
        }
    }

    /// A 404 on a name-based call means the place does not exist.
    pub(crate) fn into_lookup(self, name: &str) -> Self {
        match self {
            WeatherError::WeatherFetch {
                request: SubRequest::Current | SubRequest::Forecast,
                status: Some(StatusCode::NOT_FOUND),
                ..
            } => WeatherError::Lookup(name.to_string()),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
