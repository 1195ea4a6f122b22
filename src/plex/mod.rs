//! # Plex Integration Module
//!
//! Read-only access to a Plex Media Server: resolving a library section by its
//! title and searching it for items by original release date.
//!
//! The orchestrator only sees the [`LibraryServer`] trait, so runs can be
//! exercised against an in-memory library in tests. [`PlexClient`] is the
//! implementation backed by the Plex HTTP API, authenticated with the
//! `X-Plex-Token` header and asking for JSON instead of the default XML.
//!
//! ## API Coverage
//!
//! - `GET /library/sections` - library sections with their key and type
//! - `GET /library/sections/{key}/all` - filtered items, including guids
//!
//! Failures are never swallowed here: a section that does not exist or a
//! search that fails aborts the library's run.

mod library;

use async_trait::async_trait;

use crate::{
    Res,
    http::{HttpClient, HttpRequest},
    types::{DateWindow, LibrarySection, MediaItem, PlexConfig},
};

pub use library::search_query;

#[async_trait]
pub trait LibraryServer: Send + Sync {
    /// Resolves a library section by its display name.
    async fn section(&self, name: &str) -> Res<LibrarySection>;

    /// Items of `section` whose original release date lies within `window`
    /// (both ends inclusive).
    async fn search(&self, section: &LibrarySection, window: &DateWindow) -> Res<Vec<MediaItem>>;
}

pub struct PlexClient {
    http: HttpClient,
    base_url: String,
    token: String,
}

impl PlexClient {
    pub fn new(http: HttpClient, config: &PlexConfig) -> Self {
        PlexClient {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn request(&self, path: &str) -> HttpRequest {
        HttpRequest::get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/json")
            .header("X-Plex-Token", self.token.as_str())
    }
}
