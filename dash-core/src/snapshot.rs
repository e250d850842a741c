//! Concurrent multi-city weather snapshot.
//!
//! A snapshot picks a handful of cities from a candidate pool and fetches all
//! of them at once. The result is always a (possibly empty) list: a snapshot
//! never fails as a whole, it just shows fewer tiles.

use futures_util::future::{join_all, try_join_all};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{model::CityWeather, provider::WeatherSource};

/// How individual city failures affect the whole snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotPolicy {
    /// Keep every city that succeeded, in request order.
    #[default]
    SettleAll,
    /// Any failed city discards the whole batch.
    AllOrNothing,
}

/// Choose up to `count` distinct cities from `pool`, uniformly without replacement.
pub fn pick_cities<R: Rng + ?Sized>(pool: &[String], count: usize, rng: &mut R) -> Vec<String> {
    let mut shuffled = pool.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

/// Fetch every city concurrently and aggregate according to `policy`.
pub async fn fetch_snapshot<S>(
    source: &S,
    cities: &[String],
    policy: SnapshotPolicy,
) -> Vec<CityWeather>
where
    S: WeatherSource + ?Sized,
{
    let requests = cities.iter().map(|city| source.fetch_one(city));

    match policy {
        SnapshotPolicy::AllOrNothing => match try_join_all(requests).await {
            Ok(all) => all,
            Err(err) => {
                log::warn!("snapshot discarded, one of {} cities failed: {err}", cities.len());
                Vec::new()
            }
        },
        SnapshotPolicy::SettleAll => join_all(requests)
            .await
            .into_iter()
            .zip(cities)
            .filter_map(|(outcome, city)| match outcome {
                Ok(weather) => Some(weather),
                Err(err) => {
                    log::warn!("snapshot dropped {city:?}: {err}");
                    None
                }
            })
            .collect(),
    }
}
