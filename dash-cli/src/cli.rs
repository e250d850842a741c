use anyhow::Context;
use clap::{Parser, Subcommand};
use dash_core::{
    Config, Dashboard, JokeClient, SnapshotPolicy, WeatherSource, fetch_snapshot, pick_cities,
    weather_source_from_config,
};
use inquire::Password;

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show the current weather for a city.
    Show {
        /// City name, e.g. "Rio de Janeiro".
        city: String,
    },

    /// Show the weather for a few random world cities.
    Snapshot {
        /// Number of cities; defaults to the configured snapshot size.
        #[arg(long, short = 'n')]
        count: Option<usize>,

        /// Drop the whole snapshot if any single city fails.
        #[arg(long)]
        strict: bool,
    },

    /// Tell a random (safe-mode) joke.
    Joke,

    /// Interactive dashboard: search, snapshot tiles and jokes.
    Dashboard,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Show { city } => {
                let source = weather_source_from_config(&config)?;
                show(&source, &config, &city).await;
            }
            Command::Snapshot { count, strict } => {
                let source = weather_source_from_config(&config)?;
                let count = count.unwrap_or(config.snapshot.size);
                let policy = if strict {
                    SnapshotPolicy::AllOrNothing
                } else {
                    config.snapshot.policy
                };

                let cities = pick_cities(&config.snapshot.cities, count, &mut rand::rng());
                let snapshot = fetch_snapshot(&source, &cities, policy).await;
                print!("{}", render::snapshot_tiles(&snapshot, &config.weather.icon_base_url));
            }
            Command::Joke => {
                let client = JokeClient::with_options(&config.jokes.base_url, config.timeout())?;
                let mut dash = Dashboard::new();
                dash.refresh_joke(&client).await;
                print!("{}", render::slot(dash.joke.state(), "", render::joke));
            }
            Command::Dashboard => {
                let source = weather_source_from_config(&config)?;
                let jokes = JokeClient::with_options(&config.jokes.base_url, config.timeout())?;
                interactive::run(&config, &source, &jokes).await?;
            }
        }

        Ok(())
    }
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show<S: WeatherSource + ?Sized>(source: &S, config: &Config, city: &str) {
    let mut dash = Dashboard::new();
    let icon_base = config.weather.icon_base_url.as_str();

    dash.search(source, city).await;
    print!(
        "{}",
        render::slot(dash.search.state(), "Enter a city to see the weather.", |w| {
            render::weather_detail(w, icon_base)
        })
    );
}
