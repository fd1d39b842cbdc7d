use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::storage::{
    PostgresConfig, SqliteConfig, StorageBackend, StorageConfig,
};

/// Shortest cookie secret accepted, in bytes
pub const MIN_COOKIE_SECRET_LENGTH: usize = 32;

/// Ten years
const MAX_SESSION_TTL_HOURS: i64 = 87_600;

const COOKIE_SECRET_ENV: &str = "COOKIE_SECRET";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to make credentialed cross-origin requests
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `sqlite`, `postgres` or `memory`
    pub backend: String,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Server-side lifetime of a session, also used as the cookie max-age
    pub ttl_hours: i64,
    pub cookie_name: String,
    pub secure_cookie: bool,
    /// Seconds between expired-session sweeps; 0 disables the sweeper
    pub purge_interval_secs: u64,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Key material for signing session cookies. Falls back to the
    /// `COOKIE_SECRET` environment variable.
    pub cookie_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "cookie_secret",
                &self.cookie_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            url: "sqlite://users.sqlite".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            cookie_name: "SESSION_ID".to_string(),
            secure_cookie: false,
            purge_interval_secs: 3600,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the configured backend into a storage configuration
    pub fn storage_config(&self) -> Result<StorageConfig, DomainError> {
        let backend = StorageBackend::from_str(&self.backend).ok_or_else(|| {
            DomainError::configuration(format!("Unknown database backend: {}", self.backend))
        })?;

        Ok(match backend {
            StorageBackend::InMemory => StorageConfig::InMemory,
            StorageBackend::Sqlite => StorageConfig::Sqlite(
                SqliteConfig::new(&self.url).with_max_connections(self.max_connections),
            ),
            StorageBackend::Postgres => StorageConfig::Postgres(
                PostgresConfig::new(&self.url).with_max_connections(self.max_connections),
            ),
        })
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

impl AuthConfig {
    /// The cookie signing secret from configuration or `COOKIE_SECRET`.
    ///
    /// The service must not start without one.
    pub fn cookie_secret(&self) -> Result<Vec<u8>, DomainError> {
        select_cookie_secret(
            self.cookie_secret.as_deref(),
            std::env::var(COOKIE_SECRET_ENV).ok(),
        )
    }
}

fn select_cookie_secret(
    configured: Option<&str>,
    from_env: Option<String>,
) -> Result<Vec<u8>, DomainError> {
    let secret = configured
        .map(str::to_string)
        .or(from_env)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            DomainError::configuration(format!(
                "A cookie secret is required: set auth.cookie_secret or {}",
                COOKIE_SECRET_ENV
            ))
        })?;

    if secret.len() < MIN_COOKIE_SECRET_LENGTH {
        return Err(DomainError::configuration(format!(
            "Cookie secret must be at least {} bytes",
            MIN_COOKIE_SECRET_LENGTH
        )));
    }

    Ok(secret.into_bytes())
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }

        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session.ttl_hours) {
            return Err(DomainError::configuration(format!(
                "session.ttl_hours must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            )));
        }

        if self.session.cookie_name.is_empty() {
            return Err(DomainError::configuration(
                "session.cookie_name cannot be empty",
            ));
        }

        self.database.storage_config()?;
        Ok(())
    }
}
