//! Session token generation
//!
//! Tokens are 32 bytes from the thread-local CSPRNG encoded as unpadded
//! base64url, giving 256 bits of entropy in 43 URL- and cookie-safe chars.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use std::fmt::Debug;

use crate::domain::session::{SessionToken, SESSION_TOKEN_BYTES};

/// Source of fresh session tokens
pub trait TokenGenerator: Send + Sync + Debug {
    fn generate(&self) -> SessionToken;
}

/// Generator backed by `rand::thread_rng`
#[derive(Debug, Clone, Default)]
pub struct RandomTokenGenerator;

impl RandomTokenGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TokenGenerator for RandomTokenGenerator {
    fn generate(&self) -> SessionToken {
        let mut random_bytes = [0u8; SESSION_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        SessionToken::from_issued(URL_SAFE_NO_PAD.encode(random_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use crate::domain::session::SESSION_TOKEN_LENGTH;

    #[test]
    fn test_generated_token_is_well_formed() {
        let token = RandomTokenGenerator::new().generate();

        assert_eq!(token.as_str().len(), SESSION_TOKEN_LENGTH);
        assert_eq!(SessionToken::parse(token.as_str()), Ok(token));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let generator = RandomTokenGenerator::new();
        let tokens: HashSet<String> = (0..1000)
            .map(|_| generator.generate().as_str().to_string())
            .collect();

        assert_eq!(tokens.len(), 1000);
    }
}
