//! Account infrastructure - password hashing, storage backends and the
//! account service

mod in_memory;
mod password;
mod postgres_repository;
mod service;
mod sqlite_repository;

pub use in_memory::InMemoryAccountRepository;
pub use password::{
    Argon2Hasher, HashCost, PasswordHasher, ARGON2_ITERATIONS, ARGON2_MEMORY_KIB,
    ARGON2_PARALLELISM,
};
pub use postgres_repository::PostgresAccountRepository;
pub use service::{AccountService, AccountSession};
pub use sqlite_repository::SqliteAccountRepository;
