use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{error::WeatherError, model::Weekday};

pub const ANSWERS_FILE_NAME: &str = "answers.json";

/// "What is the temperature in `city` on `day` at `hour`?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureQuestion {
    pub city: String,
    pub day: Weekday,
    /// Raw index into the day's readings.
    pub hour: usize,
}

/// "Will the pressure in `city` on `day` go below `threshold`?"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressureQuestion {
    pub city: String,
    pub threshold: i64,
    pub day: Weekday,
}

/// Parameters of the five questions. Questions four and five take none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Questions {
    pub temperature: TemperatureQuestion,
    pub pressure: PressureQuestion,
    pub median_city: String,
}

impl Default for Questions {
    fn default() -> Self {
        Self {
            temperature: TemperatureQuestion { city: "bath".into(), day: Weekday::Wednesday, hour: 10 },
            pressure: PressureQuestion { city: "edinburgh".into(), threshold: 1000, day: Weekday::Friday },
            median_city: "cardiff".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answers {
    pub question_one: i64,
    pub question_two: bool,
    pub question_three: i64,
    pub question_four: String,
    pub question_five: bool,
}

/// The persisted document: a JSON array holding one [`Answers`] record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    records: Vec<Answers>,
}

impl AnswerSet {
    pub fn new(answers: Answers) -> Self {
        Self { records: vec![answers] }
    }

    pub fn answers(&self) -> &[Answers] {
        &self.records
    }
}

/// Destination for a finished answer set.
pub trait ResultSink {
    /// Persist `answers`, returning where they went.
    fn write(&self, answers: &AnswerSet) -> Result<PathBuf, WeatherError>;
}

/// Writes `answers.json` into a directory, replacing any previous file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(ANSWERS_FILE_NAME)
    }
}

impl ResultSink for JsonFileSink {
    fn write(&self, answers: &AnswerSet) -> Result<PathBuf, WeatherError> {
        fs::create_dir_all(&self.dir).map_err(|e| WeatherError::Io(self.dir.clone(), e))?;

        let path = self.file_path();
        let json = serde_json::to_string(answers)?;
        fs::write(&path, json).map_err(|e| WeatherError::Io(path.clone(), e))?;

        Ok(path)
    }
}
