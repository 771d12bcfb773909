use std::path::PathBuf;

use thiserror::Error;

use crate::model::Weekday;

/// Errors produced while fetching forecasts or answering questions.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}: {body}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse JSON from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected forecast shape: {0}")]
    DataShape(String),

    #[error("Unknown day '{0}'. Expected one of: monday, tuesday, wednesday, thursday, friday, saturday, sunday.")]
    UnknownDay(String),

    #[error("Forecast has no entry for {0}")]
    DayMissing(Weekday),

    #[error("Hour index {hour} is out of range for {day} ({len} timeframes)")]
    HourOutOfRange { day: Weekday, hour: usize, len: usize },

    #[error("No forecast available for city '{0}'")]
    CityNotFound(String),

    #[error("City list is empty")]
    NoCities,

    #[error("I/O error on '{}'", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to serialize answers")]
    Serialize(#[from] serde_json::Error),
}

impl WeatherError {
    /// Whether a failed request is worth repeating under the retry policy.
    pub fn is_transient(&self) -> bool {
        match self {
            WeatherError::Network { .. } => true,
            WeatherError::HttpStatus { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_server_errors_are_transient() {
        let server = WeatherError::HttpStatus {
            url: "http://x".into(),
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: String::new(),
        };
        let client = WeatherError::HttpStatus {
            url: "http://x".into(),
            status: reqwest::StatusCode::NOT_FOUND,
            body: String::new(),
        };

        assert!(server.is_transient());
        assert!(!client.is_transient());
        assert!(!WeatherError::NoCities.is_transient());
    }

    #[test]
    fn lookup_errors_name_the_day() {
        let err = WeatherError::HourOutOfRange { day: Weekday::Friday, hour: 30, len: 24 };
        let msg = err.to_string();
        assert!(msg.contains("friday"));
        assert!(msg.contains("30"));
    }
}
