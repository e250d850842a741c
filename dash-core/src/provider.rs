use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, CityWeather, FetchError, provider::openweather::OpenWeatherClient};

pub mod openweather;

/// Anything that can look up the current weather for a city by name.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_one(&self, city: &str) -> Result<CityWeather, FetchError>;
}

/// Construct the weather client from config.
pub fn weather_source_from_config(config: &Config) -> anyhow::Result<OpenWeatherClient> {
    let api_key = config.api_key()?;
    OpenWeatherClient::with_options(api_key, &config.weather.base_url, config.timeout())
}
