//! [`WeatherQueryClient`] answers questions about forecasts from a [`WeatherSource`].
//!
//! Every operation fetches fresh data. Nothing is cached between calls, and
//! calls run strictly one after another.

use tracing::{debug, info};

use crate::{
    answers::{AnswerSet, Answers, Questions},
    config::ShapeValidation,
    error::WeatherError,
    model::{WeeklyForecast, Weekday},
    query,
    source::WeatherSource,
};

#[derive(Debug)]
pub struct WeatherQueryClient<S> {
    source: S,
    validation: ShapeValidation,
}

impl<S: WeatherSource> WeatherQueryClient<S> {
    pub fn new(source: S) -> Self {
        Self { source, validation: ShapeValidation::default() }
    }

    pub fn with_validation(mut self, validation: ShapeValidation) -> Self {
        self.validation = validation;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    async fn forecast(&self, city: &str) -> Result<WeeklyForecast, WeatherError> {
        let forecast = self.source.weekly_forecast(city).await?;
        debug!(city, readings = forecast.len(), "fetched forecast");

        if self.validation == ShapeValidation::Strict {
            forecast.validate()?;
        }
        Ok(forecast)
    }

    /// Temperature in `city` on `day` at reading index `hour`.
    pub async fn get_weather_in_city(
        &self,
        city: &str,
        day: Weekday,
        hour: usize,
    ) -> Result<i64, WeatherError> {
        let forecast = self.forecast(city).await?;
        query::temperature_at(&forecast, day, hour)
    }

    /// Kept for compatibility: true only when `city` has no readings for `day`,
    /// whatever `threshold` is. Use [`Self::will_pressure_drop_below`] for the
    /// actual threshold check.
    pub async fn is_pressure_below_value(
        &self,
        city: &str,
        threshold: i64,
        day: Weekday,
    ) -> Result<bool, WeatherError> {
        let forecast = self.forecast(city).await?;
        query::pressure_list_is_empty(&forecast, day, threshold)
    }

    /// True if any reading for `city` on `day` has pressure below `threshold`.
    pub async fn will_pressure_drop_below(
        &self,
        city: &str,
        threshold: i64,
        day: Weekday,
    ) -> Result<bool, WeatherError> {
        let forecast = self.forecast(city).await?;
        query::any_pressure_below(&forecast, day, threshold)
    }

    pub async fn get_median_temp_in_city(&self, city: &str) -> Result<i64, WeatherError> {
        let forecast = self.forecast(city).await?;
        query::median_temperature(&forecast)
    }

    /// Highest wind speed for `city` over the week, negative infinity if it has no readings.
    pub async fn get_max_wind_speed(&self, city: &str) -> Result<f64, WeatherError> {
        let forecast = self.forecast(city).await?;
        Ok(query::max_wind_speed(&forecast))
    }

    /// Windiest city of the week across the source's city list.
    /// Ties resolve to the alphabetically first city.
    pub async fn find_city_with_highest_wind_speed(&self) -> Result<String, WeatherError> {
        let cities = self.source.cities().await?;

        let mut speeds = Vec::with_capacity(cities.len());
        for city in cities {
            let speed = self.get_max_wind_speed(&city).await?;
            debug!(city = city.as_str(), speed, "max wind speed");
            speeds.push((city, speed));
        }

        query::windiest_city(speeds).ok_or(WeatherError::NoCities)
    }

    /// True as soon as one listed city will see snow.
    pub async fn will_it_snow(&self) -> Result<bool, WeatherError> {
        for city in self.source.cities().await? {
            if self.will_snow_in_city(&city).await? {
                debug!(city = city.as_str(), "snow expected");
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub async fn will_snow_in_city(&self, city: &str) -> Result<bool, WeatherError> {
        let forecast = self.forecast(city).await?;
        Ok(query::will_snow(&forecast))
    }

    /// Ask all five questions in order and collect the answers.
    pub async fn answer(&self, questions: &Questions) -> Result<AnswerSet, WeatherError> {
        let t = &questions.temperature;
        let question_one = self.get_weather_in_city(&t.city, t.day, t.hour).await?;
        info!(question_one, "answered question one");

        let p = &questions.pressure;
        let question_two = self.is_pressure_below_value(&p.city, p.threshold, p.day).await?;
        info!(question_two, "answered question two");

        let question_three = self.get_median_temp_in_city(&questions.median_city).await?;
        info!(question_three, "answered question three");

        let question_four = self.find_city_with_highest_wind_speed().await?;
        info!(question_four = question_four.as_str(), "answered question four");

        let question_five = self.will_it_snow().await?;
        info!(question_five, "answered question five");

        Ok(AnswerSet::new(Answers {
            question_one,
            question_two,
            question_three,
            question_four,
            question_five,
        }))
    }
}
