use axum::{Extension, Router, routing::get};
use std::net::SocketAddr;

use crate::{api, info, management::ApprovalState};

pub fn router(state: ApprovalState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves `/health` and `/callback` on `addr` until the task is dropped.
pub async fn start_api_server(addr: SocketAddr, state: ApprovalState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Waiting for TMDb approval callback on http://{}/callback", addr);
    axum::serve(listener, router(state)).await
}
