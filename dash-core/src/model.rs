use serde::{Deserialize, Serialize};

pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Flat view of the current weather in one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    /// Display name as returned by the provider, not the query string.
    pub name: String,
    pub temperature_c: i32,
    pub condition: String,
    pub description: String,
    pub icon_id: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub visibility_m: Option<u32>,
    pub pressure_hpa: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    /// `@2x` variant used by the detail view.
    Large,
    /// Base size used by snapshot tiles.
    Small,
}

impl CityWeather {
    pub fn icon_url(&self, base_url: &str, size: IconSize) -> String {
        let base = base_url.trim_end_matches('/');
        match size {
            IconSize::Large => format!("{base}/{}@2x.png", self.icon_id),
            IconSize::Small => format!("{base}/{}.png", self.icon_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub category: String,
    pub kind: JokeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JokeKind {
    Single { joke: String },
    TwoPart { setup: String, delivery: String },
}
