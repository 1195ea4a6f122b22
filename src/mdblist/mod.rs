//! # MDBList Integration Module
//!
//! Rating lookups against MDBList, keyed by TMDb id, and the rule that decides
//! whether a title makes it onto the remote list.
//!
//! Lookups use the lenient call style of [`crate::http::HttpClient`]: a lookup
//! that keeps failing after retries is logged and treated as "no record", which
//! in turn means "exclude". A 404 (MDBList does not know the title) is also "no
//! record". Other 4xx responses, such as a rejected API key, are returned as
//! errors and end the run.

mod ratings;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    Res,
    http::{HttpClient, HttpError, HttpRequest},
    types::{MdblistConfig, MediaKind, RatingRecord},
};

pub use ratings::{imdb_rating, should_include};

pub const DEFAULT_BASE_URL: &str = "https://api.mdblist.com";

#[async_trait]
pub trait RatingSource: Send + Sync {
    /// The rating record of a title, or `None` when there is nothing usable.
    async fn rating(&self, kind: MediaKind, tmdb_id: &str) -> Res<Option<RatingRecord>>;
}

pub struct MdblistClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl MdblistClient {
    pub fn new(http: HttpClient, config: &MdblistConfig) -> Self {
        MdblistClient {
            http,
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}{}", self.base_url, path))
            .query("apikey", &self.api_key)
            .header("Content-Type", "application/json")
    }

    /// Account limits as reported by `/user`. Informational only.
    pub async fn limits(&self) -> Option<Value> {
        match self.http.request_json(&self.request("/user")).await {
            Ok(value) => value,
            Err(_) => None,
        }
    }
}

#[async_trait]
impl RatingSource for MdblistClient {
    async fn rating(&self, kind: MediaKind, tmdb_id: &str) -> Res<Option<RatingRecord>> {
        let path = format!("/tmdb/{}/{}", kind.mdblist_segment(), tmdb_id);

        match self.http.request_json(&self.request(&path)).await {
            Ok(Some(value)) => Ok(serde_json::from_value(value).ok()),
            Ok(None) => Ok(None),
            Err(HttpError::Client { status: 404, .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
