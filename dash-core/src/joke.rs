//! Random safe-mode jokes from JokeAPI.

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::{FetchError, truncate_body},
    model::{Joke, JokeKind},
};

const JOKE_PATH: &str = "/joke/Any";

#[derive(Debug, Clone)]
pub struct JokeClient {
    base_url: String,
    http: Client,
}

impl JokeClient {
    pub fn with_options(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for JokeAPI")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub async fn fetch_joke(&self) -> Result<Joke, FetchError> {
        // `safe-mode` is a bare flag, so it goes into the URL rather than `.query()`.
        let url = format!("{}{JOKE_PATH}?safe-mode", self.base_url);
        log::debug!("GET {url}");

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            log::warn!(
                "JokeAPI request failed with status {status}: {}",
                truncate_body(&body)
            );
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: JaResponse = serde_json::from_str(&body)?;
        parsed.into_joke()
    }
}

#[derive(Debug, Deserialize)]
struct JaResponse {
    #[serde(default)]
    error: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(flatten)]
    body: Option<JaBody>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JaBody {
    Single { joke: String },
    Twopart { setup: String, delivery: String },
}

impl JaResponse {
    fn into_joke(self) -> Result<Joke, FetchError> {
        if self.error {
            return Err(FetchError::Provider(
                self.message.unwrap_or_else(|| "unknown JokeAPI error".to_string()),
            ));
        }

        let kind = match self.body.ok_or(FetchError::MissingField("type"))? {
            JaBody::Single { joke } => JokeKind::Single { joke },
            JaBody::Twopart { setup, delivery } => JokeKind::TwoPart { setup, delivery },
        };

        Ok(Joke {
            category: self.category.unwrap_or_else(|| "Misc".to_string()),
            kind,
        })
    }
}
