// Core primitives shared by the registry contracts
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Digest};

/// Sequential record identifier assigned at registration (first id is 1)
pub type RecordId = u64;

/// Opaque actor identity, used both as registrant key and as authorization subject
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(address: impl Into<String>) -> Self {
        Principal(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Principal {
    fn from(address: &str) -> Self {
        Principal(address.to_string())
    }
}

impl From<String> for Principal {
    fn from(address: String) -> Self {
        Principal(address)
    }
}

impl AsRef<str> for Principal {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SHA-256 commitment over contract state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateHash(#[serde(with = "hex::serde")] pub [u8; 32]);

impl StateHash {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Display for StateHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Well-known deployment values
pub struct Policy;

impl Policy {
    /// Admin principal used when no configuration overrides it
    pub const DEFAULT_ADMIN: &'static str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";
}

/// Incremental state commitment. Every component is length-prefixed so that
/// adjacent strings cannot collide ("ab" + "c" vs "a" + "bc").
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    pub fn new(domain: &str) -> Self {
        let mut state = Self { hasher: Sha256::new() };
        state.str(domain);
        state
    }

    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.hasher.update(value.to_le_bytes());
        self
    }

    pub fn str(&mut self, value: &str) -> &mut Self {
        self.u64(value.len() as u64);
        self.hasher.update(value.as_bytes());
        self
    }

    pub fn finish(self) -> StateHash {
        StateHash(self.hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_equality_is_by_value() {
        let a = Principal::from("ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5");
        let b = Principal::new(String::from("ST1SJ3DTE5DN7X54YDH5D64R3BCB6A2AG2ZQ8YPD5"));
        assert_eq!(a, b);
        assert_ne!(a, Principal::from("ST3PF13W7Z0RRM42A8VZRVFQ75SV1K26RXEP8YGKJ"));
    }

    #[test]
    fn test_principal_serializes_as_plain_string() {
        let p = Principal::from("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG");
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG\"");
    }

    #[test]
    fn test_state_hasher_is_deterministic() {
        let mut first = StateHasher::new("test");
        first.str("registry").u64(7);
        let mut second = StateHasher::new("test");
        second.str("registry").u64(7);
        let mut other = StateHasher::new("test");
        other.str("registry").u64(8);

        let hash = first.finish();
        assert_eq!(hash, second.finish());
        assert_ne!(hash, other.finish());
        assert_eq!(hash.to_hex().len(), 64);
    }

    #[test]
    fn test_state_hasher_length_prefixes_strings() {
        let mut left = StateHasher::new("test");
        left.str("ab").str("c");
        let mut right = StateHasher::new("test");
        right.str("a").str("bc");
        assert_ne!(left.finish(), right.finish());
    }

    #[test]
    fn test_state_hasher_separates_domains() {
        let mut org = StateHasher::new("organization-verification");
        org.u64(1);
        let mut vol = StateHasher::new("volunteer-registration");
        vol.u64(1);
        assert_ne!(org.finish(), vol.finish());
    }

    #[test]
    fn test_state_hash_serializes_as_hex() {
        let hash = StateHash([0xab; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        let back: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
