use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::{fmt, time::Duration};
use tracing::{debug, warn};

use crate::{
    config::Config,
    error::WeatherError,
    model::{CityList, WeeklyForecast},
};

use super::WeatherSource;

/// How many times a transient failure is retried, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    pub retries: u32,
    pub delay: Duration,
}

/// Forecast endpoint client for one user id.
#[derive(Debug, Clone)]
pub struct HttpWeatherSource {
    id: String,
    base_url: String,
    cities_url: String,
    retry: RetryPolicy,
    http: Client,
}

impl HttpWeatherSource {
    pub fn new(id: impl Into<String>, base_url: &str, cities_url: &str) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cities_url: cities_url.to_string(),
            retry: RetryPolicy::default(),
            http: Client::new(),
        }
    }

    /// Build a source from config: URLs, retry policy and timeout.
    pub fn from_config(id: impl Into<String>, config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            ..Self::new(id, &config.base_url, &config.cities_url).with_retry(config.retry_policy())
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn forecast_url(&self, city: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.id, city)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        let mut attempt = 0;

        loop {
            match self.get_once(url).await {
                Err(err) if err.is_transient() && attempt < self.retry.retries => {
                    attempt += 1;
                    warn!(url, attempt, error = %err, "request failed, retrying");
                    tokio::time::sleep(self.retry.delay).await;
                }
                result => return result,
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, WeatherError> {
        debug!(url, "GET");

        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| WeatherError::Network { url: url.to_string(), source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Network { url: url.to_string(), source })?;

        if !status.is_success() {
            return Err(WeatherError::HttpStatus {
                url: url.to_string(),
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Decode { url: url.to_string(), source })
    }
}

impl fmt::Display for HttpWeatherSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id: {}, Url: {}", self.id, self.base_url)
    }
}

#[async_trait]
impl WeatherSource for HttpWeatherSource {
    async fn weekly_forecast(&self, city: &str) -> Result<WeeklyForecast, WeatherError> {
        let url = self.forecast_url(city);

        self.get_json(&url).await.map_err(|err| match err {
            WeatherError::HttpStatus { status, .. } if status == StatusCode::NOT_FOUND => {
                WeatherError::CityNotFound(city.to_string())
            }
            other => other,
        })
    }

    async fn cities(&self) -> Result<Vec<String>, WeatherError> {
        let list: CityList = self.get_json(&self.cities_url).await?;
        Ok(list.cities)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Weekday;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn forecast_json() -> serde_json::Value {
        let hour = json!({"temperature": 4, "pressure": 1012, "wind_speed": 9, "precipitation": 0});
        let day: Vec<_> = (0..24).map(|_| hour.clone()).collect();
        let mut obj = serde_json::Map::new();
        for d in Weekday::all() {
            obj.insert(d.as_str().to_string(), json!(day));
        }
        serde_json::Value::Object(obj)
    }

    fn source_for(server: &MockServer) -> HttpWeatherSource {
        HttpWeatherSource::new(
            "42",
            &format!("{}/api/weather/", server.uri()),
            &format!("{}/api/cities/", server.uri()),
        )
    }

    #[test]
    fn forecast_url_trims_trailing_slash() {
        let source = HttpWeatherSource::new("7", "http://host/api/weather/", "http://host/api/cities/");
        assert_eq!(source.forecast_url("bath"), "http://host/api/weather/7/bath");
        assert_eq!(source.to_string(), "Id: 7, Url: http://host/api/weather");
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
        let long = "é".repeat(150);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert!(cut.len() <= 203);
    }

    #[tokio::test]
    async fn fetches_forecast_for_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather/42/bath"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_json()))
            .mount(&server)
            .await;

        let forecast = source_for(&server).weekly_forecast("bath").await.unwrap();

        assert_eq!(forecast.len(), 168);
        assert!(forecast.validate().is_ok());
    }

    #[tokio::test]
    async fn fetches_city_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cities/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cities": ["bath", "york"]})))
            .mount(&server)
            .await;

        let cities = source_for(&server).cities().await.unwrap();
        assert_eq!(cities, vec!["bath", "york"]);
    }

    #[tokio::test]
    async fn unknown_city_maps_to_city_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such city"))
            .mount(&server)
            .await;

        let err = source_for(&server).weekly_forecast("atlantis").await.unwrap_err();
        assert!(matches!(err, WeatherError::CityNotFound(city) if city == "atlantis"));
    }

    #[tokio::test]
    async fn malformed_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"monday\": 3}"))
            .mount(&server)
            .await;

        let err = source_for(&server).weekly_forecast("bath").await.unwrap_err();
        assert!(matches!(err, WeatherError::Decode { .. }));
    }

    #[tokio::test]
    async fn fails_fast_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = source_for(&server).cities().await.unwrap_err();

        assert!(matches!(
            err,
            WeatherError::HttpStatus { status, .. } if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cities": ["leeds"]})))
            .mount(&server)
            .await;

        let source = source_for(&server).with_retry(RetryPolicy { retries: 2, delay: Duration::ZERO });
        let cities = source.cities().await.unwrap();

        assert_eq!(cities, vec!["leeds"]);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let source = source_for(&server).with_retry(RetryPolicy { retries: 5, delay: Duration::ZERO });
        assert!(source.cities().await.is_err());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }
}
