//! Token identity: the seed hash plus a derived numeric token id.
//!
//! Only `hash` feeds [`SeededRandom`](crate::prng::SeededRandom); the token id
//! namespaces a run under a project number and never influences the artwork.

use serde::{Deserialize, Serialize};

/// Multiplier separating project numbers in a token id.
const PROJECT_STRIDE: u64 = 1_000_000;

/// Number of hex digits in a canonical hash, after the `0x` prefix.
const HASH_DIGITS: usize = 64;

/// Seed hash and token id for one generated artwork.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenData {
    pub hash: String,
    pub token_id: String,
}

impl TokenData {
    /// Creates token data from a hash, a project number and a per-project serial.
    ///
    /// The token id is `project * 1_000_000 + serial`.
    pub fn new(hash: impl Into<String>, project: u64, serial: u64) -> Self {
        Self {
            hash: hash.into(),
            token_id: Self::token_id_for(project, serial),
        }
    }

    /// Builds the decimal token id for a project number and serial.
    pub fn token_id_for(project: u64, serial: u64) -> String {
        project
            .saturating_mul(PROJECT_STRIDE)
            .saturating_add(serial)
            .to_string()
    }

    /// Formats 32 random bytes as a canonical `0x`-prefixed hash.
    pub fn hash_from_bytes(bytes: &[u8; 32]) -> String {
        let mut hash = String::with_capacity(2 + HASH_DIGITS);
        hash.push_str("0x");
        for b in bytes {
            hash.push_str(&format!("{b:02x}"));
        }
        hash
    }

    /// Returns whether the hash is `0x` followed by exactly 64 hex digits.
    ///
    /// Non-canonical hashes still seed a deterministic stream; this only
    /// exists so callers can warn about them.
    pub fn is_canonical(&self) -> bool {
        self.hash
            .strip_prefix("0x")
            .is_some_and(|digits| {
                digits.len() == HASH_DIGITS && digits.chars().all(|c| c.is_ascii_hexdigit())
            })
    }
}
