use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::error::WeatherError;

pub const DAYS_PER_WEEK: usize = 7;
pub const HOURS_PER_DAY: usize = 24;

/// Day key used by the forecast endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }

    pub const fn all() -> &'static [Weekday] {
        &[
            Weekday::Monday,
            Weekday::Tuesday,
            Weekday::Wednesday,
            Weekday::Thursday,
            Weekday::Friday,
            Weekday::Saturday,
            Weekday::Sunday,
        ]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Weekday {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        Weekday::all()
            .iter()
            .copied()
            .find(|day| day.as_str() == lower)
            .ok_or_else(|| WeatherError::UnknownDay(value.to_string()))
    }
}

impl FromStr for Weekday {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::try_from(s)
    }
}

/// One hourly reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeframe {
    pub temperature: i64,
    pub pressure: i64,
    pub wind_speed: i64,
    /// Anything above zero means precipitation is expected.
    pub precipitation: f64,
}

/// Seven days of hourly readings for one city, as returned by
/// `GET {base_url}/{id}/{city}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyForecast {
    days: BTreeMap<Weekday, Vec<Timeframe>>,
}

impl WeeklyForecast {
    pub fn new(days: BTreeMap<Weekday, Vec<Timeframe>>) -> Self {
        Self { days }
    }

    pub fn day(&self, day: Weekday) -> Option<&[Timeframe]> {
        self.days.get(&day).map(Vec::as_slice)
    }

    /// Every reading of the week, Monday first, hours in source order.
    pub fn timeframes(&self) -> impl Iterator<Item = &Timeframe> {
        self.days.values().flatten()
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, &[Timeframe])> {
        self.days.iter().map(|(day, frames)| (*day, frames.as_slice()))
    }

    /// Total number of readings across all days.
    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check for exactly seven days of exactly 24 readings each.
    pub fn validate(&self) -> Result<(), WeatherError> {
        if let Some(missing) = Weekday::all().iter().find(|day| !self.days.contains_key(*day)) {
            return Err(WeatherError::DataShape(format!("missing day '{missing}'")));
        }

        for (day, frames) in &self.days {
            if frames.len() != HOURS_PER_DAY {
                return Err(WeatherError::DataShape(format!(
                    "'{day}' has {} timeframes, expected {HOURS_PER_DAY}",
                    frames.len()
                )));
            }
        }

        Ok(())
    }
}

impl FromIterator<(Weekday, Vec<Timeframe>)> for WeeklyForecast {
    fn from_iter<I: IntoIterator<Item = (Weekday, Vec<Timeframe>)>>(iter: I) -> Self {
        Self { days: iter.into_iter().collect() }
    }
}

/// Body of the cities endpoint: `{"cities": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityList {
    pub cities: Vec<String>,
}
