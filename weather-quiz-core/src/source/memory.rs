use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{error::WeatherError, model::WeeklyForecast};

use super::WeatherSource;

/// Source backed by forecasts already held in memory.
///
/// Counts forecast fetches so callers can observe how often data was requested.
#[derive(Debug, Default)]
pub struct MemorySource {
    forecasts: HashMap<String, WeeklyForecast>,
    cities: Vec<String>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a city with its forecast; it is appended to the city list.
    pub fn with_city(mut self, city: impl Into<String>, forecast: WeeklyForecast) -> Self {
        let city = city.into();
        self.cities.push(city.clone());
        self.forecasts.insert(city, forecast);
        self
    }

    /// Replace the city list without touching stored forecasts.
    pub fn with_city_list(mut self, cities: Vec<String>) -> Self {
        self.cities = cities;
        self
    }

    pub fn forecast_fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherSource for MemorySource {
    async fn weekly_forecast(&self, city: &str) -> Result<WeeklyForecast, WeatherError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        self.forecasts
            .get(city)
            .cloned()
            .ok_or_else(|| WeatherError::CityNotFound(city.to_string()))
    }

    async fn cities(&self) -> Result<Vec<String>, WeatherError> {
        Ok(self.cities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_stored_forecasts_and_counts_fetches() {
        let source = MemorySource::new().with_city("bath", WeeklyForecast::default());

        assert!(source.weekly_forecast("bath").await.is_ok());
        assert!(matches!(
            source.weekly_forecast("york").await,
            Err(WeatherError::CityNotFound(city)) if city == "york"
        ));
        assert_eq!(source.forecast_fetches(), 2);
        assert_eq!(source.cities().await.unwrap(), vec!["bath"]);
    }

    #[tokio::test]
    async fn city_list_can_be_overridden() {
        let source = MemorySource::new()
            .with_city("bath", WeeklyForecast::default())
            .with_city_list(vec!["york".into(), "bath".into()]);

        assert_eq!(source.cities().await.unwrap(), vec!["york", "bath"]);
    }
}
