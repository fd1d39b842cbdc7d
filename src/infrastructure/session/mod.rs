//! Session infrastructure - token generation, storage backends and the store

mod generator;
mod in_memory;
mod postgres_repository;
mod sqlite_repository;
mod store;

pub use generator::{RandomTokenGenerator, TokenGenerator};
pub use in_memory::InMemorySessionRepository;
pub use postgres_repository::PostgresSessionRepository;
pub use sqlite_repository::SqliteSessionRepository;
pub use store::{SessionStore, MAX_TOKEN_ATTEMPTS};
