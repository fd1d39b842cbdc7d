//! HTTP routing
//!
//! Every route is declared with an explicit access level. Public routes are
//! reachable without a session; protected routes sit behind the session gate.

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, MethodRouter},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use super::auth;
use super::health;
use super::middleware::{
    body_limit_middleware, logging_middleware, require_session, security_headers_middleware,
};
use super::state::AppState;

/// Whether a route requires a live session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected,
}

pub struct RouteDef {
    pub path: &'static str,
    pub access: Access,
    pub handler: MethodRouter<AppState>,
}

/// The full route table
pub fn route_table() -> Vec<RouteDef> {
    vec![
        RouteDef {
            path: "/health",
            access: Access::Public,
            handler: get(health::health_check),
        },
        RouteDef {
            path: "/live",
            access: Access::Public,
            handler: get(health::live_check),
        },
        RouteDef {
            path: "/register",
            access: Access::Public,
            handler: axum::routing::post(auth::register),
        },
        RouteDef {
            path: "/signin",
            access: Access::Public,
            handler: get(auth::signin).post(auth::signin),
        },
        RouteDef {
            path: "/logout",
            access: Access::Public,
            handler: get(auth::logout).post(auth::logout),
        },
        RouteDef {
            path: "/session",
            access: Access::Protected,
            handler: get(auth::current_session),
        },
    ]
}

/// Create the router with no cross-origin access
pub fn create_router(state: AppState) -> Router {
    create_router_with_cors(state, &[])
}

/// Create the router, allowing credentialed requests from `cors_origins`
pub fn create_router_with_cors(state: AppState, cors_origins: &[String]) -> Router {
    let mut public = Router::new();
    let mut protected = Router::new();

    for route in route_table() {
        match route.access {
            Access::Public => public = public.route(route.path, route.handler),
            Access::Protected => protected = protected.route(route.path, route.handler),
        }
    }

    let protected = protected.route_layer(from_fn_with_state(state.clone(), require_session));

    public
        .merge(protected)
        .with_state(state)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(body_limit_middleware))
        .layer(from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{HeaderMap, Request, StatusCode};
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::cookies::SessionCookies;
    use crate::infrastructure::account::{AccountService, Argon2Hasher, HashCost};
    use crate::infrastructure::session::SessionStore;
    use crate::infrastructure::storage::Stores;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";
    const CREDENTIALS: &str = r#"{"email":"a@x.com","password":"longpass1"}"#;

    fn test_app() -> Router {
        let stores = Stores::in_memory();
        let sessions = SessionStore::new(
            stores.sessions,
            stores.accounts.clone(),
            Duration::hours(24),
        );
        let accounts = AccountService::new(
            stores.accounts,
            sessions,
            Arc::new(Argon2Hasher::with_cost(HashCost::minimal())),
        );
        let cookies =
            SessionCookies::new(SECRET, "SESSION_ID", Duration::hours(24), false).unwrap();

        create_router(AppState::new(accounts, cookies))
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn cookie_request(method: &str, uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("cookie", cookie)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, headers, body)
    }

    /// The `name=value` pair a browser would send back
    fn session_cookie(headers: &HeaderMap) -> String {
        let set_cookie = headers.get("set-cookie").unwrap().to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[test]
    fn test_only_session_route_is_protected() {
        let protected: Vec<&str> = route_table()
            .into_iter()
            .filter(|route| route.access == Access::Protected)
            .map(|route| route.path)
            .collect();

        assert_eq!(protected, vec!["/session"]);
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = test_app();

        let (status, headers, body) = send(
            &app,
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert!(headers.contains_key("x-request-id"));

        let (status, _, _) = send(
            &app,
            Request::builder().uri("/live").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_login_logout_flow() {
        let app = test_app();

        // Register without any prior session
        let (status, headers, body) =
            send(&app, json_request("POST", "/register", CREDENTIALS)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["email"], "a@x.com");
        assert_eq!(body["sessionId"].as_str().unwrap().len(), 43);
        assert!(body.get("password").is_none());
        let set_cookie = headers.get("set-cookie").unwrap().to_str().unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Max-Age=86400"));
        let registered_token = body["sessionId"].as_str().unwrap().to_string();

        // Sign in with the same credentials
        let (status, headers, body) = send(&app, json_request("GET", "/signin", CREDENTIALS)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"], json!({ "id": 1, "email": "a@x.com" }));
        let token = body["sessionId"].as_str().unwrap().to_string();
        assert_ne!(token, registered_token);
        let cookie = session_cookie(&headers);

        // The signed cookie passes the gate
        let (status, _, body) = send(&app, cookie_request("GET", "/session", &cookie)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": 1, "email": "a@x.com" }));

        // Logout with the token in the body
        let logout_body = json!({ "sessionId": token }).to_string();
        let (status, headers, body) =
            send(&app, json_request("POST", "/logout", &logout_body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "loggedOut": true }));
        assert!(headers
            .get("set-cookie")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));

        // The revoked session no longer passes the gate
        let (status, _, body) = send(&app, cookie_request("GET", "/session", &cookie)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["type"], "authentication_error");

        // The registration session is still live
        let registered_body = json!({ "sessionId": registered_token }).to_string();
        let (status, _, _) = send(&app, json_request("GET", "/session", &registered_body)).await;
        assert_eq!(status, StatusCode::OK);

        // A second logout finds nothing
        let (status, _, body) = send(&app, json_request("GET", "/logout", &logout_body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "session_not_found");
    }

    #[tokio::test]
    async fn test_logout_with_cookie() {
        let app = test_app();
        let (_, headers, _) = send(&app, json_request("POST", "/register", CREDENTIALS)).await;
        let cookie = session_cookie(&headers);

        let (status, _, _) = send(&app, cookie_request("POST", "/logout", &cookie)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = send(&app, cookie_request("GET", "/session", &cookie)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_requires_a_token() {
        let app = test_app();

        let (status, _, body) = send(
            &app,
            Request::builder()
                .method("POST")
                .uri("/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["details"][0]["field"], "sessionId");
    }

    #[tokio::test]
    async fn test_logout_with_malformed_token_is_not_found() {
        let app = test_app();

        let (status, _, _) =
            send(&app, json_request("POST", "/logout", r#"{"sessionId":"nope"}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflicts() {
        let app = test_app();

        let (status, _, _) = send(&app, json_request("POST", "/register", CREDENTIALS)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, headers, body) =
            send(&app, json_request("POST", "/register", CREDENTIALS)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "account_exists");
        assert!(headers.get("set-cookie").is_none());

        // The first account still signs in
        let (status, _, _) = send(&app, json_request("POST", "/signin", CREDENTIALS)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let app = test_app();

        let (status, _, body) = send(
            &app,
            json_request("POST", "/register", r#"{"email":"not-an-email","password":"short"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        let fields: Vec<&str> = body["error"]["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["email", "password"]);
    }

    #[tokio::test]
    async fn test_register_dotless_domain_is_a_field_error() {
        let app = test_app();

        let (status, _, body) = send(
            &app,
            json_request("POST", "/register", r#"{"email":"a@localhost","password":"longpass1"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["details"][0]["field"], "email");
        assert_eq!(
            body["error"]["details"][0]["message"],
            "must be a valid email address"
        );
    }

    #[tokio::test]
    async fn test_signin_failures_look_identical() {
        let app = test_app();
        send(&app, json_request("POST", "/register", CREDENTIALS)).await;

        let (unknown_status, _, unknown_body) = send(
            &app,
            json_request("POST", "/signin", r#"{"email":"b@x.com","password":"longpass1"}"#),
        )
        .await;
        let (wrong_status, _, wrong_body) = send(
            &app,
            json_request("POST", "/signin", r#"{"email":"a@x.com","password":"wrongpass1"}"#),
        )
        .await;

        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_body, wrong_body);
        assert_eq!(unknown_body["error"]["code"], "invalid_credentials");
    }

    #[tokio::test]
    async fn test_session_requires_authentication() {
        let app = test_app();

        let (status, _, body) = send(
            &app,
            Request::builder().uri("/session").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "unauthorized");

        let (status, _, _) = send(
            &app,
            json_request("GET", "/session", r#"{"sessionId":"garbage"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_body_session_id_wins_over_stale_cookie() {
        let app = test_app();

        let (_, stale_headers, stale_body) =
            send(&app, json_request("POST", "/register", CREDENTIALS)).await;
        let stale_cookie = session_cookie(&stale_headers);
        let (_, _, live_body) = send(&app, json_request("POST", "/signin", CREDENTIALS)).await;

        let logout = json!({ "sessionId": stale_body["sessionId"] }).to_string();
        let (status, _, _) = send(&app, json_request("POST", "/logout", &logout)).await;
        assert_eq!(status, StatusCode::OK);

        let claim = json!({ "sessionId": live_body["sessionId"] }).to_string();
        let request = Request::builder()
            .method("GET")
            .uri("/session")
            .header("content-type", "application/json")
            .header("cookie", stale_cookie)
            .body(Body::from(claim))
            .unwrap();
        let (status, _, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_forged_cookie_is_rejected() {
        let app = test_app();
        let (_, _, body) = send(&app, json_request("POST", "/register", CREDENTIALS)).await;
        let token = body["sessionId"].as_str().unwrap();

        // A valid token in an unsigned cookie does not pass the gate
        let forged = format!("SESSION_ID={}", token);
        let (status, _, _) = send(&app, cookie_request("GET", "/session", &forged)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
