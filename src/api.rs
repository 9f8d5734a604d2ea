//! Character API client
//!
//! Blocking client for the Rick and Morty REST API. Handlers talk to the
//! [`CharacterSource`] trait so tests can substitute a mock.

use std::time::Duration;

use rand::Rng;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::{Error, Result};

/// One character as served by `GET <base>/<id>`
///
/// Replaced wholesale in the session on every successful fetch; unknown
/// wire fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterRecord {
    /// Character ID
    pub id: u32,

    /// Display name
    pub name: String,

    /// Portrait URL, if the API has one
    #[serde(default)]
    pub image: Option<String>,

    /// Episode URLs in broadcast order
    #[serde(default)]
    pub episode: Vec<String>,
}

/// Episode metadata as served by `GET <episode-url>`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpisodeRecord {
    /// Episode title
    pub name: String,

    /// Episode code (e.g. "S01E01")
    pub episode: String,
}

/// Source of character data
///
/// `fetch(None)` picks a uniformly random ID in `[1, max]` on the caller's
/// side of the API.
pub trait CharacterSource {
    /// Fetch one character by ID, or a random one for `None`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for a 404, [`Error::Api`] for any other
    /// non-success status, [`Error::Network`] for transport failures.
    fn fetch(&self, id: Option<u32>) -> Result<CharacterRecord>;

    /// Fetch metadata for one episode URL
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] or [`Error::Network`] like [`Self::fetch`].
    fn fetch_episode(&self, url: &str) -> Result<EpisodeRecord>;

    /// Download raw image bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] or [`Error::Network`] like [`Self::fetch`].
    fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP implementation of [`CharacterSource`]
pub struct CharacterClient {
    http: reqwest::blocking::Client,
    base_url: String,
    max_id: u32,
}

impl CharacterClient {
    /// Create a client with the configured base URL and timeout
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is empty, the ID range is empty, or
    /// the underlying HTTP client cannot be built
    pub fn new(config: &ApiConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::Config("api.base_url must not be empty".to_string()));
        }
        if config.max_character_id == 0 {
            return Err(Error::Config(
                "api.max_character_id must be at least 1".to_string(),
            ));
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_id: config.max_character_id,
        })
    }

    /// Highest character ID the API serves
    #[must_use]
    pub const fn max_id(&self) -> u32 {
        self.max_id
    }

    fn character_url(&self, id: u32) -> String {
        format!("{}/{id}", self.base_url)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api { status });
        }
        Ok(response.json::<T>()?)
    }
}

impl CharacterSource for CharacterClient {
    fn fetch(&self, id: Option<u32>) -> Result<CharacterRecord> {
        let id = id.unwrap_or_else(|| rand::thread_rng().gen_range(1..=self.max_id));
        tracing::debug!(id, "fetching character");

        let response = self.http.get(self.character_url(id)).send()?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound { id });
        }
        if !status.is_success() {
            return Err(Error::Api { status });
        }

        let record = response.json::<CharacterRecord>()?;
        tracing::debug!(id = record.id, name = %record.name, "character fetched");
        Ok(record)
    }

    fn fetch_episode(&self, url: &str) -> Result<EpisodeRecord> {
        tracing::debug!(url, "fetching episode metadata");
        self.get_json(url)
    }

    fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "downloading image");
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api { status });
        }
        Ok(response.bytes()?.to_vec())
    }
}
