//! Session gate middleware
//!
//! Runs the authorization gate in front of protected routes. The claimed
//! token is the JSON body field `sessionId`, or failing that the signed
//! session cookie. Logout reads the two sources in the same order.

use axum::{
    body::{to_bytes, Body},
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::api::state::AppState;
use crate::api::types::{ApiError, SessionRequest};
use crate::domain::account::Account;

/// Largest body buffered while looking for a `sessionId`
const MAX_SESSION_BODY_BYTES: usize = 64 * 1024;

/// The account resolved by the gate, stored in request extensions
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

/// Extractor for handlers behind the gate
#[derive(Debug, Clone)]
pub struct RequireAccount(pub Account);

impl<S> FromRequestParts<S> for RequireAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentAccount>()
            .map(|current| RequireAccount(current.0.clone()))
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Extract `sessionId` from a JSON body, ignoring anything unparsable
pub fn session_id_from_body(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }

    serde_json::from_slice::<SessionRequest>(bytes)
        .ok()
        .map(|request| request.session_id)
}

/// Read the claimed token and split the request back together so the
/// handler still sees the original body
pub async fn claimed_token(
    state: &AppState,
    request: Request,
) -> Result<(Option<String>, Request), ApiError> {
    let (parts, body) = request.into_parts();

    let bytes = to_bytes(body, MAX_SESSION_BODY_BYTES)
        .await
        .map_err(|_| ApiError::bad_request("Request body too large"))?;
    let token = session_id_from_body(&bytes).or_else(|| state.cookies.read(&parts.headers));

    Ok((token, Request::from_parts(parts, Body::from(bytes))))
}

/// Reject requests without a live session; expose the account otherwise
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (claimed, mut request) = claimed_token(&state, request).await?;

    let account = state.gate.authorize(claimed.as_deref()).await?;
    request.extensions_mut().insert(CurrentAccount(account));

    Ok(next.run(request).await)
}
