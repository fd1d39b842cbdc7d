//! Account endpoints
//!
//! Registration, sign-in, logout and the current-session lookup. Successful
//! registration and sign-in set the signed session cookie; logout expires it.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::middleware::session_auth::session_id_from_body;
use crate::api::middleware::RequireAccount;
use crate::api::state::AppState;
use crate::api::types::{
    AccountResponse, ApiError, CredentialsRequest, FieldError, Json, LogoutResponse,
    RegisterResponse, SigninResponse, ValidatedJson,
};
use crate::domain::session::SessionToken;

/// POST /register
///
/// Creates the account and signs it in. 409 if the email is taken.
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> Result<Response, ApiError> {
    let registered = state
        .accounts
        .register(&request.email, &request.password)
        .await?;

    let cookie = state.cookies.issue(registered.session.token())?;
    let body = RegisterResponse {
        id: registered.account.id(),
        email: registered.account.email().to_string(),
        session_id: registered.session.token().as_str().to_string(),
        expires_at: registered.session.expires_at(),
    };

    Ok((StatusCode::CREATED, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// GET|POST /signin
///
/// Unknown email and wrong password both answer 401 `invalid_credentials`.
pub async fn signin(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> Result<Response, ApiError> {
    let signed_in = state
        .accounts
        .login(&request.email, &request.password)
        .await?;

    let cookie = state.cookies.issue(signed_in.session.token())?;
    let body = SigninResponse {
        user: AccountResponse::from(&signed_in.account),
        session_id: signed_in.session.token().as_str().to_string(),
        expires_at: signed_in.session.expires_at(),
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// GET|POST /logout
///
/// Revokes the session named by the body's `sessionId`, or by the session
/// cookie when the body has none. 404 when no such session exists.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let claimed = session_id_from_body(&body).or_else(|| state.cookies.read(&headers));

    let Some(claimed) = claimed else {
        return Err(ApiError::validation(vec![FieldError::new(
            "sessionId",
            "is required",
        )]));
    };

    let removed = match SessionToken::parse(&claimed) {
        Ok(token) => state.accounts.logout(&token).await?,
        Err(e) => {
            debug!("Logout with malformed session token: {}", e);
            false
        }
    };

    if !removed {
        return Err(ApiError::not_found("Session not found").with_code("session_not_found"));
    }

    let cookie = state.cookies.expire()?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LogoutResponse { logged_out: true }),
    )
        .into_response())
}

/// GET /session
///
/// The account behind the caller's session. Only reachable through the gate.
pub async fn current_session(RequireAccount(account): RequireAccount) -> Json<AccountResponse> {
    Json(AccountResponse::from(&account))
}
