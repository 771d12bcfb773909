//! Aggregations over a single [`WeeklyForecast`].
//!
//! Nothing here performs I/O; [`crate::client::WeatherQueryClient`] fetches
//! the data and hands it to these functions.

use crate::{
    error::WeatherError,
    model::{Timeframe, WeeklyForecast, Weekday},
};

/// Sorted positions averaged for the median of a full 168-reading week.
pub const MEDIAN_POSITIONS: (usize, usize) = (84, 85);

/// Snow needs precipitation and a temperature strictly below this.
pub const SNOW_TEMPERATURE_LIMIT: i64 = 2;

fn day_frames(forecast: &WeeklyForecast, day: Weekday) -> Result<&[Timeframe], WeatherError> {
    forecast.day(day).ok_or(WeatherError::DayMissing(day))
}

/// Temperature of the reading at `hour`, the 0-based index into the
/// day's list as delivered by the data source.
pub fn temperature_at(
    forecast: &WeeklyForecast,
    day: Weekday,
    hour: usize,
) -> Result<i64, WeatherError> {
    let frames = day_frames(forecast, day)?;

    frames
        .get(hour)
        .map(|t| t.temperature)
        .ok_or(WeatherError::HourOutOfRange { day, hour, len: frames.len() })
}

/// Legacy pressure check: true only when `day` has no readings at all.
///
/// `threshold` does not influence the result. See [`any_pressure_below`]
/// for the check the question actually describes.
pub fn pressure_list_is_empty(
    forecast: &WeeklyForecast,
    day: Weekday,
    _threshold: i64,
) -> Result<bool, WeatherError> {
    Ok(day_frames(forecast, day)?.is_empty())
}

/// True if any reading on `day` has pressure strictly below `threshold`.
pub fn any_pressure_below(
    forecast: &WeeklyForecast,
    day: Weekday,
    threshold: i64,
) -> Result<bool, WeatherError> {
    Ok(day_frames(forecast, day)?.iter().any(|t| t.pressure < threshold))
}

/// Truncated mean of the temperatures at [`MEDIAN_POSITIONS`] after sorting
/// the whole week.
pub fn median_temperature(forecast: &WeeklyForecast) -> Result<i64, WeatherError> {
    let mut temps: Vec<i64> = forecast.timeframes().map(|t| t.temperature).collect();
    temps.sort_unstable();

    let (low, high) = MEDIAN_POSITIONS;
    match (temps.get(low), temps.get(high)) {
        (Some(a), Some(b)) => Ok((a + b) / 2),
        _ => Err(WeatherError::DataShape(format!(
            "median needs at least {} readings, got {}",
            high + 1,
            temps.len()
        ))),
    }
}

/// Highest wind speed of the week; negative infinity when there are no readings.
pub fn max_wind_speed(forecast: &WeeklyForecast) -> f64 {
    forecast
        .timeframes()
        .map(|t| t.wind_speed as f64)
        .fold(f64::NEG_INFINITY, f64::max)
}

pub fn is_snowing(frame: &Timeframe) -> bool {
    frame.precipitation > 0.0 && frame.temperature < SNOW_TEMPERATURE_LIMIT
}

/// True at the first reading that [`is_snowing`].
pub fn will_snow(forecast: &WeeklyForecast) -> bool {
    forecast.timeframes().any(is_snowing)
}

/// City with the highest speed; ties go to the alphabetically first name.
pub fn windiest_city<I, S>(speeds: I) -> Option<String>
where
    I: IntoIterator<Item = (S, f64)>,
    S: Into<String>,
{
    let mut best: Option<(String, f64)> = None;

    for (city, speed) in speeds {
        let city = city.into();
        let replace = match &best {
            None => true,
            Some((name, top)) => speed > *top || (speed == *top && city < *name),
        };
        if replace {
            best = Some((city, speed));
        }
    }

    best.map(|(city, _)| city)
}
