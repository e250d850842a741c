//! The dashboard's three independent slots: search, snapshot and joke.
//!
//! Each slot follows `Idle -> Loading -> Success | Failure` and goes back to
//! `Loading` on the next trigger. Front ends either use the `begin_*` /
//! `resolve_*` pairs around their own fetches, or the async helpers that do
//! begin, fetch and resolve in one go.

use rand::Rng;

use crate::{
    error::FetchError,
    joke::JokeClient,
    model::{CityWeather, Joke},
    provider::WeatherSource,
    snapshot::{SnapshotPolicy, fetch_snapshot, pick_cities},
    state::{Slot, Ticket},
};

pub const JOKE_FAILURE_MESSAGE: &str = "Could not fetch a joke. Try again.";
// Never shown: `fetch_snapshot` reports total failure as an empty list, so the
// snapshot slot only resolves with `Ok`. `Slot` still needs a message.
const SNAPSHOT_FAILURE_MESSAGE: &str = "Could not load the weather snapshot.";

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub search: Slot<CityWeather>,
    pub snapshot: Slot<Vec<CityWeather>>,
    pub joke: Slot<Joke>,
    query: Option<String>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            search: Slot::new("search", FetchError::CITY_MESSAGE),
            snapshot: Slot::new("snapshot", SNAPSHOT_FAILURE_MESSAGE),
            joke: Slot::new("joke", JOKE_FAILURE_MESSAGE),
            query: None,
        }
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The city the search slot was last pointed at.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Start a search for `input`. Blank input leaves every slot untouched.
    pub fn submit_search(&mut self, input: &str) -> Option<(String, Ticket)> {
        let city = input.trim();
        if city.is_empty() {
            return None;
        }

        self.query = Some(city.to_string());
        Some((city.to_string(), self.search.begin()))
    }

    /// Point the search slot at the city of snapshot tile `index`.
    pub fn select_snapshot_city(&mut self, index: usize) -> Option<(String, Ticket)> {
        let name = self.snapshot.value()?.get(index)?.name.clone();
        self.submit_search(&name)
    }

    pub fn resolve_search(&mut self, ticket: Ticket, outcome: Result<CityWeather, FetchError>) -> bool {
        self.search.resolve(ticket, outcome)
    }

    pub fn begin_snapshot(&mut self) -> Ticket {
        self.snapshot.begin()
    }

    pub fn resolve_snapshot(&mut self, ticket: Ticket, cities: Vec<CityWeather>) -> bool {
        self.snapshot.resolve(ticket, Ok::<_, FetchError>(cities))
    }

    pub fn begin_joke(&mut self) -> Ticket {
        self.joke.begin()
    }

    pub fn resolve_joke(&mut self, ticket: Ticket, outcome: Result<Joke, FetchError>) -> bool {
        self.joke.resolve(ticket, outcome)
    }

    /// Submit a search and wait for it. Returns `false` for blank input.
    pub async fn search<S>(&mut self, source: &S, input: &str) -> bool
    where
        S: WeatherSource + ?Sized,
    {
        let Some((city, ticket)) = self.submit_search(input) else {
            return false;
        };

        let outcome = source.fetch_one(&city).await;
        self.resolve_search(ticket, outcome)
    }

    /// Re-run the search for snapshot tile `index`.
    pub async fn search_snapshot_city<S>(&mut self, source: &S, index: usize) -> bool
    where
        S: WeatherSource + ?Sized,
    {
        let Some((city, ticket)) = self.select_snapshot_city(index) else {
            return false;
        };

        let outcome = source.fetch_one(&city).await;
        self.resolve_search(ticket, outcome)
    }

    /// Pick `count` random cities from `pool` and load them into the snapshot slot.
    pub async fn refresh_snapshot<S, R>(
        &mut self,
        source: &S,
        pool: &[String],
        count: usize,
        policy: SnapshotPolicy,
        rng: &mut R,
    ) -> bool
    where
        S: WeatherSource + ?Sized,
        R: Rng + ?Sized,
    {
        let cities = pick_cities(pool, count, rng);
        let ticket = self.begin_snapshot();
        let snapshot = fetch_snapshot(source, &cities, policy).await;
        self.resolve_snapshot(ticket, snapshot)
    }

    pub async fn refresh_joke(&mut self, client: &JokeClient) -> bool {
        let ticket = self.begin_joke();
        let outcome = client.fetch_joke().await;
        self.resolve_joke(ticket, outcome)
    }
}
