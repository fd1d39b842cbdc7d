//! Password hashing using Argon2id

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use std::fmt::Debug;

use crate::domain::account::HashedPassword;
use crate::domain::DomainError;

/// Argon2 memory cost in KiB
pub const ARGON2_MEMORY_KIB: u32 = 19_456;
/// Argon2 iteration count
pub const ARGON2_ITERATIONS: u32 = 2;
/// Argon2 lanes
pub const ARGON2_PARALLELISM: u32 = 1;

/// Work factor applied to every new hash.
///
/// Verification always uses the parameters embedded in the stored hash, so
/// raising the cost never invalidates existing accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: ARGON2_MEMORY_KIB,
            iterations: ARGON2_ITERATIONS,
            parallelism: ARGON2_PARALLELISM,
        }
    }
}

impl HashCost {
    /// Smallest cost Argon2 accepts. Only for tests.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

/// One-way, salted password hashing
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a plaintext password with a fresh random salt
    fn hash(&self, plaintext: &str) -> Result<HashedPassword, DomainError>;

    /// Check a plaintext against a stored hash.
    ///
    /// A wrong password is `Ok(false)`; only malformed hash material errors.
    fn verify(&self, plaintext: &str, hash: &HashedPassword) -> Result<bool, DomainError>;
}

/// Argon2id password hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    cost: HashCost,
}

impl Argon2Hasher {
    /// Create a hasher with the default work factor
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cost(cost: HashCost) -> Self {
        Self { cost }
    }

    fn argon2(&self) -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(
            self.cost.memory_kib,
            self.cost.iterations,
            self.cost.parallelism,
            None,
        )
        .map_err(|e| DomainError::hashing(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<HashedPassword, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| HashedPassword::from_phc(hash.to_string()))
            .map_err(|e| DomainError::hashing(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, plaintext: &str, hash: &HashedPassword) -> Result<bool, DomainError> {
        let parsed_hash = PasswordHash::new(hash.as_str())
            .map_err(|e| DomainError::hashing(format!("Malformed password hash: {}", e)))?;

        match self.argon2()?.verify_password(plaintext.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::hashing(format!(
                "Failed to verify password: {}",
                e
            ))),
        }
    }
}
