//! Infrastructure layer - hashing, storage backends, session management and
//! the services built on them

pub mod account;
pub mod auth;
pub mod logging;
pub mod session;
pub mod storage;
