use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::{FetchError, truncate_body},
    model::CityWeather,
};

use super::WeatherSource;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn with_options(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn fetch_current(&self, city: &str) -> Result<CityWeather, FetchError> {
        let url = format!("{}{CURRENT_WEATHER_PATH}", self.base_url);
        log::debug!("GET {url} q={city:?} units=metric");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            log::warn!(
                "OpenWeather request for {city:?} failed with status {status}: {}",
                truncate_body(&body)
            );
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        parsed.into_city_weather()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
    pressure: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
}

impl OwCurrentResponse {
    fn into_city_weather(self) -> Result<CityWeather, FetchError> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or(FetchError::MissingField("weather[0]"))?;

        Ok(CityWeather {
            name: self.name,
            temperature_c: round_half_up(self.main.temp),
            condition: weather.main,
            description: weather.description,
            icon_id: weather.icon,
            humidity_pct: self.main.humidity,
            wind_speed_mps: self.wind.speed,
            visibility_m: self.visibility,
            pressure_hpa: self.main.pressure,
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_one(&self, city: &str) -> Result<CityWeather, FetchError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(FetchError::EmptyQuery);
        }

        self.fetch_current(city).await
    }
}

/// Nearest integer, with halves going towards positive infinity (`-2.5` -> `-2`).
fn round_half_up(value: f64) -> i32 {
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture(temp: f64) -> serde_json::Value {
        json!({
            "coord": { "lon": 2.35, "lat": 48.85 },
            "weather": [
                { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }
            ],
            "main": {
                "temp": temp,
                "feels_like": 11.2,
                "pressure": 1012,
                "humidity": 81
            },
            "visibility": 9000,
            "wind": { "speed": 5.66, "deg": 240 },
            "dt": 1_700_000_000,
            "name": "Paris"
        })
    }

    async fn client_for(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::with_options("TEST_KEY".into(), &server.uri(), Duration::from_secs(5))
            .expect("client must build")
    }

    #[tokio::test]
    async fn maps_current_weather_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "paris"))
            .and(query_param("appid", "TEST_KEY"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(12.6)))
            .expect(1)
            .mount(&server)
            .await;

        let weather = client_for(&server).await.fetch_one("paris").await.unwrap();

        assert_eq!(
            weather,
            CityWeather {
                name: "Paris".into(),
                temperature_c: 13,
                condition: "Rain".into(),
                description: "light rain".into(),
                icon_id: "10d".into(),
                humidity_pct: 81,
                wind_speed_mps: 5.66,
                visibility_m: Some(9000),
                pressure_hpa: Some(1012),
            }
        );
    }

    #[tokio::test]
    async fn city_name_with_spaces_is_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "Rio de Janeiro"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(25.0)))
            .expect(1)
            .mount(&server)
            .await;

        let weather = client_for(&server)
            .await
            .fetch_one("  Rio de Janeiro ")
            .await
            .unwrap();

        assert_eq!(weather.temperature_c, 25);
    }

    #[tokio::test]
    async fn optional_fields_may_be_absent() {
        let server = MockServer::start().await;
        let mut body = fixture(-0.4);
        body.as_object_mut().unwrap().remove("visibility");
        body["main"].as_object_mut().unwrap().remove("pressure");

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let weather = client_for(&server).await.fetch_one("Paris").await.unwrap();

        assert_eq!(weather.temperature_c, 0);
        assert_eq!(weather.visibility_m, None);
        assert_eq!(weather.pressure_hpa, None);
    }

    #[tokio::test]
    async fn non_success_status_fails_regardless_of_body() {
        for (status, body) in [
            (404, r#"{"cod":"404","message":"city not found"}"#),
            (401, r#"{"cod":401,"message":"Invalid API key"}"#),
            (429, "slow down"),
            (500, ""),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status).set_body_string(body))
                .mount(&server)
                .await;

            let err = client_for(&server).await.fetch_one("Atlantis").await.unwrap_err();

            assert!(
                matches!(err, FetchError::Status { status: s, .. } if s.as_u16() == status),
                "unexpected error for {status}: {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_one("Paris").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn empty_weather_array_builds_nothing() {
        let server = MockServer::start().await;
        let mut body = fixture(10.0);
        body["weather"] = json!([]);

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_one("Paris").await.unwrap_err();
        assert!(matches!(err, FetchError::MissingField("weather[0]")));
    }

    #[tokio::test]
    async fn blank_city_is_rejected_without_a_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture(10.0)))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_one("   ").await.unwrap_err();
        assert!(matches!(err, FetchError::EmptyQuery));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_request_failure() {
        let client = OpenWeatherClient::with_options(
            "KEY".into(),
            "http://127.0.0.1:9",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.fetch_one("Paris").await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_api_key() {
        let client = OpenWeatherClient::with_options(
            "SUPERSECRETKEY".into(),
            "http://127.0.0.1:9",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.fetch_one("Paris").await.unwrap_err();
        let logged = format!("search: request #1 failed: {err}");

        assert!(matches!(err, FetchError::Request(_)));
        assert!(!logged.contains("SUPERSECRETKEY"), "key leaked: {logged}");
        assert!(!format!("{err:?}").contains("SUPERSECRETKEY"));
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(12.5), 13);
        assert_eq!(round_half_up(12.49), 12);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(0.499_999_999_999_999_94), 0);
        assert_eq!(round_half_up(-0.5), 0);
    }
}
