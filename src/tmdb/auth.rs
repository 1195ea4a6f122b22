use super::{APPROVE_URL, TmdbClient};
use crate::{
    http::{HttpError, HttpRequest},
    types::{AccessTokenRequest, AccessTokenResponse, RequestTokenRequest, RequestTokenResponse},
};

/// URL the user opens to approve `request_token`.
pub fn approve_url(request_token: &str) -> String {
    format!("{}?request_token={}", APPROVE_URL, request_token)
}

impl TmdbClient {
    pub fn has_read_token(&self) -> bool {
        self.read_token.is_some()
    }

    fn read_request(&self, path: &str) -> HttpRequest {
        let token = self.read_token.as_deref().unwrap_or_default();
        HttpRequest::post(self.url(path))
            .header("Content-Type", "application/json;charset=utf-8")
            .bearer(token)
    }

    /// Starts a handshake. TMDb sends the browser to `redirect_to` once the
    /// user approved, if given.
    pub async fn create_request_token(
        &self,
        redirect_to: Option<String>,
    ) -> Result<String, HttpError> {
        let request = self
            .read_request("/auth/request_token")
            .json(&RequestTokenRequest { redirect_to })?;
        let response: RequestTokenResponse = self.http.fetch_json(&request).await?;
        Ok(response.request_token)
    }

    /// Exchanges an approved request token for a user access token.
    pub async fn create_access_token(&self, request_token: &str) -> Result<String, HttpError> {
        let request = self
            .read_request("/auth/access_token")
            .json(&AccessTokenRequest {
                request_token: request_token.to_string(),
            })?;
        let response: AccessTokenResponse = self.http.fetch_json(&request).await?;
        Ok(response.access_token)
    }
}
