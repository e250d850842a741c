use chrono::{DateTime, Local, Utc};
use dash_core::{CityWeather, IconSize, Joke, JokeKind, SlotState};

pub fn weather_detail(weather: &CityWeather, icon_base: &str) -> String {
    let mut out = format!(
        "{name}\n  {temp}°C  {condition} ({description})\n  Humidity: {humidity}%\n  Wind: {wind} m/s\n",
        name = weather.name,
        temp = weather.temperature_c,
        condition = weather.condition,
        description = weather.description,
        humidity = weather.humidity_pct,
        wind = weather.wind_speed_mps,
    );

    if let Some(visibility) = weather.visibility_m {
        out.push_str(&format!("  Visibility: {:.1} km\n", f64::from(visibility) / 1000.0));
    }
    if let Some(pressure) = weather.pressure_hpa {
        out.push_str(&format!("  Pressure: {pressure} hPa\n"));
    }
    out.push_str(&format!("  Icon: {}\n", weather.icon_url(icon_base, IconSize::Large)));

    out
}

pub fn snapshot_tiles(cities: &[CityWeather], icon_base: &str) -> String {
    if cities.is_empty() {
        return "No snapshot available right now.\n".to_string();
    }

    cities
        .iter()
        .enumerate()
        .map(|(i, w)| {
            format!(
                "[{n}] {name:<16} {temp:>4}°C  {condition:<12} {icon}\n",
                n = i + 1,
                name = w.name,
                temp = w.temperature_c,
                condition = w.condition,
                icon = w.icon_url(icon_base, IconSize::Small),
            )
        })
        .collect()
}

pub fn joke(joke: &Joke) -> String {
    match &joke.kind {
        JokeKind::Single { joke: text } => format!("({})\n{text}\n", joke.category),
        JokeKind::TwoPart { setup, delivery } => {
            format!("({})\n{setup}\n... {delivery}\n", joke.category)
        }
    }
}

/// Render a slot, delegating the success case to `render_value`.
pub fn slot<T>(
    state: &SlotState<T>,
    idle_text: &str,
    render_value: impl Fn(&T) -> String,
) -> String {
    match state {
        SlotState::Idle => format!("{idle_text}\n"),
        SlotState::Loading => "Loading...\n".to_string(),
        SlotState::Failure { message } => format!("{message}\n"),
        SlotState::Success { value, updated_at } => {
            format!("{}  (updated {})\n", render_value(value), local_time(*updated_at))
        }
    }
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}
