//! Snapshot and search flows against a mocked OpenWeather endpoint.

use std::time::Duration;

use dash_core::{
    Dashboard, OpenWeatherClient, SlotState, SnapshotPolicy, fetch_snapshot,
};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn body(name: &str, temp: f64) -> serde_json::Value {
    json!({
        "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": temp, "humidity": 30, "pressure": 1010 },
        "wind": { "speed": 1.5 },
        "visibility": 10000,
        "name": name
    })
}

async fn mount_city(server: &MockServer, city: &str, temp: f64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", city))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body(city, temp))
                .set_delay(Duration::from_millis(50)),
        )
        .mount(server)
        .await;
}

async fn mount_missing(server: &MockServer, city: &str) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", city))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_options("TEST_KEY".into(), &server.uri(), Duration::from_secs(5))
        .expect("client must build")
}

fn cities(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn four_cities_four_entries() {
    let server = MockServer::start().await;
    for (city, temp) in [("Tokyo", 14.2), ("Cairo", 29.5), ("Lima", 18.0), ("Oslo", -4.6)] {
        mount_city(&server, city, temp).await;
    }

    let snapshot = fetch_snapshot(
        &client(&server),
        &cities(&["Tokyo", "Cairo", "Lima", "Oslo"]),
        SnapshotPolicy::AllOrNothing,
    )
    .await;

    let temps: Vec<(&str, i32)> = snapshot
        .iter()
        .map(|w| (w.name.as_str(), w.temperature_c))
        .collect();
    assert_eq!(temps, vec![("Tokyo", 14), ("Cairo", 30), ("Lima", 18), ("Oslo", -5)]);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn one_missing_city_under_each_policy() {
    let server = MockServer::start().await;
    for city in ["Tokyo", "Cairo", "Oslo"] {
        mount_city(&server, city, 10.0).await;
    }
    mount_missing(&server, "Atlantis").await;

    let request = cities(&["Tokyo", "Atlantis", "Cairo", "Oslo"]);
    let client = client(&server);

    let strict = fetch_snapshot(&client, &request, SnapshotPolicy::AllOrNothing).await;
    assert!(strict.is_empty());

    let settled = fetch_snapshot(&client, &request, SnapshotPolicy::SettleAll).await;
    let names: Vec<&str> = settled.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Tokyo", "Cairo", "Oslo"]);
}

#[tokio::test]
async fn dashboard_search_against_provider() {
    let server = MockServer::start().await;
    mount_city(&server, "Cairo", 31.4).await;
    mount_missing(&server, "Atlantis").await;
    let client = client(&server);

    let mut dash = Dashboard::new();

    dash.search(&client, "Cairo").await;
    assert_eq!(dash.search.value().map(|w| w.temperature_c), Some(31));

    dash.search(&client, "Atlantis").await;
    assert_eq!(
        dash.search.state(),
        &SlotState::Failure {
            message: "City not found or network error."
        }
    );
}
