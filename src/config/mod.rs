//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig, SessionConfig,
    MIN_COOKIE_SECRET_LENGTH,
};
