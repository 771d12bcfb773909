use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::WeatherError, model::WeeklyForecast};

pub mod http;
pub mod memory;

pub use http::{HttpWeatherSource, RetryPolicy};
pub use memory::MemorySource;

/// Where forecasts and the list of known cities come from.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Fresh weekly forecast for `city`.
    async fn weekly_forecast(&self, city: &str) -> Result<WeeklyForecast, WeatherError>;

    /// Cities the source currently knows, in source order.
    async fn cities(&self) -> Result<Vec<String>, WeatherError>;
}
