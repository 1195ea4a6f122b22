use std::{net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::Mutex,
    time::{sleep, timeout},
};

use super::{ConfigError, ConfigStore};
use crate::{
    config,
    http::{HttpClient, HttpError},
    info,
    server::start_api_server,
    success,
    tmdb::{TmdbClient, auth::approve_url},
    warning,
};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("TMDb request failed: {0}")]
    Http(#[from] HttpError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("TMDb approval was not confirmed within {0} seconds")]
    Timeout(u64),
    #[error("cannot read confirmation from the console: {0}")]
    Io(#[from] std::io::Error),
    #[error("tmdb.access_token is required to request user approval")]
    MissingToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    NoToken,
    AwaitingApproval {
        request_token: String,
        approve_url: String,
    },
    Authenticated {
        access_token: String,
    },
}

/// A request token waiting for the user, shared with the callback server.
#[derive(Debug, Clone)]
pub struct PendingApproval {
    pub request_token: String,
    pub approved: bool,
}

pub type ApprovalState = Arc<Mutex<Option<PendingApproval>>>;

/// The manual step between creating a request token and exchanging it.
#[async_trait]
pub trait ApprovalGate: Send + Sync {
    /// Where TMDb should send the browser after approval, if anywhere.
    fn redirect_to(&self) -> Option<String> {
        None
    }

    /// Returns once the user approved `request_token`.
    async fn wait(&self, request_token: &str, approve_url: &str) -> Result<(), AuthError>;
}

/// Waits for Enter on the console or, when `SERVER_ADDRESS` is set, for TMDb
/// to redirect the browser to the local callback; whichever comes first.
pub struct ConsoleApproval {
    timeout: Duration,
    server_addr: Option<SocketAddr>,
}

impl ConsoleApproval {
    pub fn new(timeout: Duration, server_addr: Option<SocketAddr>) -> Self {
        ConsoleApproval {
            timeout,
            server_addr,
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::approval_timeout(), config::server_addr())
    }
}

#[async_trait]
impl ApprovalGate for ConsoleApproval {
    fn redirect_to(&self) -> Option<String> {
        self.server_addr
            .map(|addr| format!("http://{}/callback", addr))
    }

    async fn wait(&self, request_token: &str, approve_url: &str) -> Result<(), AuthError> {
        let state: ApprovalState = Arc::new(Mutex::new(Some(PendingApproval {
            request_token: request_token.to_string(),
            approved: false,
        })));

        let server = self.server_addr.map(|addr| {
            let server_state = Arc::clone(&state);
            tokio::spawn(async move {
                if let Err(e) = start_api_server(addr, server_state).await {
                    warning!("Approval callback server stopped: {}", e);
                }
            })
        });

        if webbrowser::open(approve_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                approve_url
            );
        }
        info!("Navigate to the URL and then hit enter when authenticated");

        let confirmed = timeout(self.timeout, async {
            tokio::select! {
                line = wait_for_enter() => line.map_err(AuthError::from),
                _ = wait_for_callback(Arc::clone(&state)) => Ok(()),
            }
        })
        .await;

        if let Some(handle) = server {
            handle.abort();
        }

        match confirmed {
            Ok(result) => result,
            Err(_) => Err(AuthError::Timeout(self.timeout.as_secs())),
        }
    }
}

async fn wait_for_enter() -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match lines.next_line().await? {
        Some(_) => Ok(()),
        // stdin is closed; only the callback can confirm from here on
        None => std::future::pending().await,
    }
}

async fn wait_for_callback(state: ApprovalState) {
    loop {
        {
            let lock = state.lock().await;
            if lock.as_ref().is_some_and(|pending| pending.approved) {
                return;
            }
        }
        sleep(Duration::from_secs(1)).await;
    }
}

/// Hands out a TMDb client carrying a user access token, walking
/// `NoToken -> AwaitingApproval -> Authenticated` when the configuration
/// does not have one yet. A newly obtained token is written back to the
/// configuration document.
pub struct CredentialManager<'a> {
    store: &'a mut ConfigStore,
    state: AuthState,
}

impl<'a> CredentialManager<'a> {
    pub fn new(store: &'a mut ConfigStore) -> Self {
        let state = match store
            .config()
            .tmdb
            .authenticated_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
        {
            Some(token) => AuthState::Authenticated {
                access_token: token.to_string(),
            },
            None => AuthState::NoToken,
        };

        CredentialManager { store, state }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub async fn ensure(
        mut self,
        http: &HttpClient,
        gate: &dyn ApprovalGate,
    ) -> Result<TmdbClient, AuthError> {
        let client = TmdbClient::new(http.clone(), &self.store.config().tmdb);

        if matches!(self.state, AuthState::Authenticated { .. }) {
            info!("Authenticated token loaded from file.");
        }

        loop {
            match self.state.clone() {
                AuthState::Authenticated { access_token } => {
                    return Ok(client.with_session(access_token));
                }
                AuthState::NoToken => {
                    if !client.has_read_token() {
                        return Err(AuthError::MissingToken);
                    }

                    info!("No authenticated token found. Starting TMDb authentication.");
                    let request_token = client.create_request_token(gate.redirect_to()).await?;
                    let approve_url = approve_url(&request_token);
                    info!("{}", approve_url);

                    self.state = AuthState::AwaitingApproval {
                        request_token,
                        approve_url,
                    };
                }
                AuthState::AwaitingApproval {
                    request_token,
                    approve_url,
                } => {
                    gate.wait(&request_token, &approve_url).await?;
                    let access_token = client.create_access_token(&request_token).await?;

                    self.store.set_authenticated_token(access_token.clone());
                    self.store.persist().await?;
                    success!(
                        "Authenticated token saved to {}",
                        self.store.path().display()
                    );

                    self.state = AuthState::Authenticated { access_token };
                }
            }
        }
    }
}
