//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather and JokeAPI clients
//! - Concurrent multi-city snapshots
//! - Per-slot fetch state for front ends
//!
//! It is used by `weather-dash-cli`, but can also back other front ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod joke;
pub mod model;
pub mod provider;
pub mod snapshot;
pub mod state;

pub use config::Config;
pub use dashboard::Dashboard;
pub use error::FetchError;
pub use joke::JokeClient;
pub use model::{CityWeather, IconSize, Joke, JokeKind};
pub use provider::{WeatherSource, openweather::OpenWeatherClient, weather_source_from_config};
pub use snapshot::{SnapshotPolicy, fetch_snapshot, pick_cities};
pub use state::{Slot, SlotState, Ticket};
