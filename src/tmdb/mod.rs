//! # TMDb Integration Module
//!
//! This module implements the two parts of the TMDb v4 API that Throwback
//! needs: the user approval handshake that yields a user access token, and
//! replacing the contents of a user list.
//!
//! ## Architecture
//!
//! ```text
//! Credential Manager (management::CredentialManager)
//!          ↓
//! TmdbClient ── auth: request token, approval URL, access token exchange
//!          └─── list: clear, add items   (ListPublisher)
//!          ↓
//! HttpClient (retry policy, reqwest transport)
//!          ↓
//! TMDb API v4
//! ```
//!
//! ## Tokens
//!
//! TMDb v4 distinguishes two bearer tokens:
//! - **Read access token** (`tmdb.access_token` in the configuration) - issued
//!   with the API key, only good for starting the approval handshake.
//! - **User access token** (`tmdb.authenticated_token`) - obtained once the user
//!   approved a request token, required for any list write.
//!
//! A [`TmdbClient`] is built with the read token and upgraded with
//! [`TmdbClient::with_session`] once the user token is known.
//!
//! ## API Coverage
//!
//! - `POST /4/auth/request_token` - start a handshake
//! - `POST /4/auth/access_token` - exchange an approved request token
//! - `GET /4/list/{id}/clear` - remove every item from a list
//! - `POST /4/list/{id}/items` - add items to a list
//!
//! ## Error Types
//!
//! All calls use the strict style of [`HttpClient::fetch_json`], so a list
//! update that keeps failing after retries ends the library's run instead of
//! leaving the failure unnoticed.

pub mod auth;
pub mod list;

use async_trait::async_trait;

use crate::{
    Res,
    http::{HttpClient, HttpRequest},
    types::{ListEntry, ListId, TmdbConfig},
};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org";
pub const APPROVE_URL: &str = "https://www.themoviedb.org/auth/access";

/// Destination of the filtered titles: a remote list that is cleared and
/// refilled on every run.
#[async_trait]
pub trait ListPublisher: Send + Sync {
    async fn clear(&self, list_id: &ListId) -> Res<()>;

    async fn add_items(&self, list_id: &ListId, items: &[ListEntry]) -> Res<()>;
}

#[derive(Clone)]
pub struct TmdbClient {
    http: HttpClient,
    base_url: String,
    read_token: Option<String>,
    session_token: Option<String>,
}

impl TmdbClient {
    pub fn new(http: HttpClient, config: &TmdbConfig) -> Self {
        TmdbClient {
            http,
            base_url: config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            read_token: config.access_token.clone(),
            session_token: config.authenticated_token.clone(),
        }
    }

    pub fn with_session(mut self, access_token: String) -> Self {
        self.session_token = Some(access_token);
        self
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/4{}", self.base_url, path)
    }

    fn session_request(&self, request: HttpRequest) -> Res<HttpRequest> {
        let token = self
            .session_token
            .as_deref()
            .ok_or("TMDb user access token missing. Authenticate first.")?;
        Ok(request
            .header("Content-Type", "application/json;charset=utf-8")
            .bearer(token))
    }
}
