use axum::{extract::State, http::HeaderMap, Extension, Json};

use crate::{
    models::{MessageResponse, SessionStatus},
    utils::{extractors::extract_claims, jwt::Claims},
    AppState,
};

/// Tokens are stateless, so the client discards its copy; the server only
/// acknowledges the request.
pub async fn logout(Extension(claims): Extension<Claims>) -> Json<MessageResponse> {
    tracing::info!("User {} logged out", claims.username);

    Json(MessageResponse::new("Logged out successfully"))
}

pub async fn session_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SessionStatus> {
    let status = match extract_claims(&headers, &state.auth) {
        Ok(claims) => SessionStatus {
            is_authenticated: true,
            username: Some(claims.username),
            is_admin: Some(claims.is_admin),
        },
        Err(_) => SessionStatus::anonymous(),
    };

    Json(status)
}
