//! Hashed password capability type

use std::fmt;

/// Output of the credential hasher: a PHC-format string embedding the
/// algorithm, cost parameters and salt.
///
/// Only the hasher and the storage layer (re-loading a value it previously
/// stored) can construct one, so a plaintext can never be passed where a hash
/// is expected.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub(crate) fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let hash = HashedPassword::from_phc("$argon2id$v=19$m=8,t=1,p=1$c2FsdA$aGFzaA");
        let debug = format!("{:?}", hash);

        assert!(!debug.contains("argon2id"));
        assert!(debug.contains("REDACTED"));
    }
}
