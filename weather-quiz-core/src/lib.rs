//! Core library for the `weather-quiz` CLI.
//!
//! This crate defines:
//! - Configuration (endpoints, retry policy, question parameters)
//! - Typed weekly forecasts and the aggregations run over them
//! - Abstraction over forecast sources, with an HTTP implementation
//! - The five-question answer set and where it gets written
//!
//! It is used by `weather-quiz-cli`, but can also be reused by other binaries or services.

pub mod answers;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod source;

pub use answers::{AnswerSet, Answers, JsonFileSink, Questions, ResultSink};
pub use client::WeatherQueryClient;
pub use config::{Config, ShapeValidation};
pub use error::WeatherError;
pub use model::{Timeframe, WeeklyForecast, Weekday};
pub use source::{HttpWeatherSource, MemorySource, WeatherSource};
