use std::fmt;

use dash_core::{Config, Dashboard, JokeClient, WeatherSource};
use inquire::{InquireError, Select, Text};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Search,
    PickTile,
    NewSnapshot,
    NewJoke,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Search => "Search a city",
            Action::PickTile => "Open a snapshot city",
            Action::NewSnapshot => "New snapshot",
            Action::NewJoke => "New joke",
            Action::Quit => "Quit",
        })
    }
}

/// Menu entries available for the current dashboard state.
fn actions(dash: &Dashboard) -> Vec<Action> {
    let has_tiles = dash.snapshot.value().is_some_and(|tiles| !tiles.is_empty());

    let mut actions = vec![Action::Search];
    if has_tiles {
        actions.push(Action::PickTile);
    }
    actions.extend([Action::NewSnapshot, Action::NewJoke, Action::Quit]);
    actions
}

pub async fn run<S>(config: &Config, source: &S, jokes: &JokeClient) -> anyhow::Result<()>
where
    S: WeatherSource + ?Sized,
{
    let mut dash = Dashboard::new();
    let icon_base = config.weather.icon_base_url.as_str();
    let snapshot = &config.snapshot;

    // Both "on mount" fetches.
    dash.refresh_snapshot(
        source,
        &snapshot.cities,
        snapshot.size,
        snapshot.policy,
        &mut rand::rng(),
    )
    .await;
    dash.refresh_joke(jokes).await;

    loop {
        print_dashboard(&dash, icon_base);

        let action = match Select::new("What next?", actions(&dash)).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match action {
            Action::Search => {
                let input = match Text::new("City:").prompt() {
                    Ok(input) => input,
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(err) => return Err(err.into()),
                };
                dash.search(source, &input).await;
            }
            Action::PickTile => {
                let names: Vec<String> = dash
                    .snapshot
                    .value()
                    .map(|tiles| tiles.iter().map(|w| w.name.clone()).collect())
                    .unwrap_or_default();

                match Select::new("City:", names).raw_prompt() {
                    Ok(choice) => {
                        dash.search_snapshot_city(source, choice.index).await;
                    }
                    Err(InquireError::OperationCanceled) => continue,
                    Err(InquireError::OperationInterrupted) => break,
                    Err(err) => return Err(err.into()),
                }
            }
            Action::NewSnapshot => {
                dash.refresh_snapshot(
                    source,
                    &snapshot.cities,
                    snapshot.size,
                    snapshot.policy,
                    &mut rand::rng(),
                )
                .await;
            }
            Action::NewJoke => {
                dash.refresh_joke(jokes).await;
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

fn print_dashboard(dash: &Dashboard, icon_base: &str) {
    println!("\n=== Weather Dashboard ===");
    print!(
        "{}",
        render::slot(dash.search.state(), "Enter a city to see the weather.", |w| {
            render::weather_detail(w, icon_base)
        })
    );

    println!("\n--- Around the world ---");
    print!(
        "{}",
        render::slot(dash.snapshot.state(), "No snapshot yet.", |tiles| {
            render::snapshot_tiles(tiles, icon_base)
        })
    );

    println!("\n--- Joke ---");
    print!("{}", render::slot(dash.joke.state(), "No joke yet.", render::joke));
}
