//! Session cookie transport
//!
//! The session token travels in a signed, HttpOnly cookie. A cookie whose
//! signature does not verify is treated as absent.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time, Cookie, CookieJar, Key, SameSite};

use crate::domain::session::SessionToken;
use crate::domain::DomainError;

#[derive(Clone)]
pub struct SessionCookies {
    key: Key,
    name: String,
    max_age: time::Duration,
    secure: bool,
}

impl std::fmt::Debug for SessionCookies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookies")
            .field("name", &self.name)
            .field("max_age", &self.max_age)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionCookies {
    /// `secret` must be at least 32 bytes; the signing key is derived from it
    pub fn new(
        secret: &[u8],
        name: impl Into<String>,
        ttl: chrono::Duration,
        secure: bool,
    ) -> Result<Self, DomainError> {
        if secret.len() < 32 {
            return Err(DomainError::configuration(
                "Cookie secret must be at least 32 bytes",
            ));
        }

        Ok(Self {
            key: Key::derive_from(secret),
            name: name.into(),
            max_age: time::Duration::seconds(ttl.num_seconds()),
            secure,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Set-Cookie` value carrying a freshly issued token
    pub fn issue(&self, token: &SessionToken) -> Result<HeaderValue, DomainError> {
        let cookie = Cookie::build((self.name.clone(), token.as_str().to_string()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(self.max_age)
            .secure(self.secure)
            .build();

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);

        let signed = jar
            .get(&self.name)
            .ok_or_else(|| DomainError::internal("Signed cookie missing from jar"))?;

        to_header_value(signed)
    }

    /// `Set-Cookie` value telling the browser to drop the session cookie
    pub fn expire(&self) -> Result<HeaderValue, DomainError> {
        let mut cookie = Cookie::build((self.name.clone(), ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure)
            .build();
        cookie.make_removal();

        to_header_value(&cookie)
    }

    /// The token from a correctly signed session cookie, if any
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        let mut jar = CookieJar::new();

        for value in headers.get_all(header::COOKIE) {
            let Ok(value) = value.to_str() else {
                continue;
            };

            for cookie in Cookie::split_parse_encoded(value).flatten() {
                jar.add_original(cookie.into_owned());
            }
        }

        jar.signed(&self.key)
            .get(&self.name)
            .map(|cookie| cookie.value().to_string())
    }
}

fn to_header_value(cookie: &Cookie<'_>) -> Result<HeaderValue, DomainError> {
    HeaderValue::from_str(&cookie.encoded().to_string())
        .map_err(|e| DomainError::internal(format!("Invalid cookie header: {}", e)))
}
