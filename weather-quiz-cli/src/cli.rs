use anyhow::Context;
use clap::{ArgAction, Parser};
use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};
use tracing::info;
use weather_quiz_core::{
    Config, HttpWeatherSource, JsonFileSink, ResultSink, ShapeValidation, WeatherQueryClient,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-quiz",
    version,
    about = "Answer five questions about this week's forecast and save them to answers.json"
)]
pub struct Cli {
    /// Your id on the weather service.
    pub id: String,

    /// Directory for answers.json; skips the interactive prompt.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Config file to use instead of the platform default.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Forecast endpoint; forecasts are fetched from <BASE_URL>/<ID>/<CITY>.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Endpoint returning {"cities": [...]}.
    #[arg(long)]
    pub cities_url: Option<String>,

    /// Retry transient failures this many times (default: fail fast).
    #[arg(long)]
    pub retries: Option<u32>,

    /// Accept forecasts that don't have exactly seven days of 24 readings.
    #[arg(long)]
    pub lenient: bool,

    /// Never prompt; use the configured output directory.
    #[arg(long)]
    pub no_input: bool,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse arguments; usage errors go to stderr with exit code 1.
    pub fn parse_or_exit() -> Self {
        match Self::try_parse() {
            Ok(cli) => cli,
            Err(err) if err.use_stderr() => {
                let _ = err.print();
                std::process::exit(1);
            }
            Err(err) => err.exit(),
        }
    }

    /// Load config from `--config` or the platform path, then apply flag overrides.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(url) = &self.cities_url {
            config.cities_url = url.clone();
        }
        if let Some(retries) = self.retries {
            config.retries = retries;
        }
        if self.lenient {
            config.validation = ShapeValidation::Lenient;
        }
        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }

        Ok(config)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let output_dir = self.resolve_output_dir(&config)?;

        let source = HttpWeatherSource::from_config(self.id.as_str(), &config)?;
        info!(%source, save_path = %output_dir.display(), "starting run");

        let client = WeatherQueryClient::new(source).with_validation(config.validation);
        let answers = client
            .answer(&config.questions)
            .await
            .context("Failed to answer questions")?;

        let path = JsonFileSink::new(output_dir).write(&answers)?;
        println!("Answers saved to {}", path.display());

        Ok(())
    }

    fn resolve_output_dir(&self, config: &Config) -> anyhow::Result<PathBuf> {
        if self.output.is_some() || self.no_input || !std::io::stdin().is_terminal() {
            return Ok(config.output_dir.clone());
        }

        let reply = inquire::Text::new("Where to save the answers?")
            .with_help_message(&format!(
                "Enter to save in {}",
                describe_dir(&config.output_dir)
            ))
            .prompt()
            .context("Failed to read save directory")?;

        Ok(choose_output_dir(&reply, &config.output_dir))
    }
}

/// Empty (or whitespace) reply keeps the default.
fn choose_output_dir(reply: &str, default: &Path) -> PathBuf {
    let reply = reply.trim();
    if reply.is_empty() {
        default.to_path_buf()
    } else {
        PathBuf::from(reply)
    }
}

fn describe_dir(dir: &Path) -> String {
    if dir == Path::new(".") {
        "current directory".to_string()
    } else {
        dir.display().to_string()
    }
}
