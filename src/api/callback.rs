use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{management::ApprovalState, warning};

/// TMDb sends the browser here with `request_token` and `approved=true` once
/// the user approved access.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<ApprovalState>,
) -> Html<&'static str> {
    let approved = params.get("approved").is_some_and(|v| v == "true");
    let Some(request_token) = params.get("request_token") else {
        return Html("<h4>Missing request token.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(pending) = state.as_mut() else {
        return Html("<h4>No TMDb approval is pending.</h4>");
    };

    if pending.request_token != *request_token {
        warning!("Ignoring approval callback for an unknown request token");
        return Html("<h4>Unknown request token.</h4>");
    }

    if !approved {
        return Html("<h4>Access was not approved.</h4>");
    }

    pending.approved = true;
    Html("<h2>Approval received.</h2><p>Close this browser window.</p>")
}
