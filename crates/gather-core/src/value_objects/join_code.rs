//! Join codes - the short codes users redeem to join events, organizations and tasks

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::DomainError;

/// A normalized 6-character `[A-Z0-9]` code
///
/// Construction always goes through [`JoinCode::parse`] or [`JoinCode::generate`],
/// so a `JoinCode` value is upper-case and well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinCode(String);

impl JoinCode {
    pub const LENGTH: usize = 6;
    pub const ALPHABET: &'static [u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Normalize user input (trim + upper-case) and validate it
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let normalized = input.trim().to_ascii_uppercase();

        if normalized.len() != Self::LENGTH {
            return Err(DomainError::InvalidCode(format!(
                "code must be exactly {} characters",
                Self::LENGTH
            )));
        }
        if !normalized.bytes().all(|b| Self::ALPHABET.contains(&b)) {
            return Err(DomainError::InvalidCode(
                "code may only contain letters and digits".to_string(),
            ));
        }

        Ok(Self(normalized))
    }

    /// Draw a uniformly random code. Uniqueness is the caller's concern.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..Self::LENGTH)
            .map(|_| Self::ALPHABET[rng.gen_range(0..Self::ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for JoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for JoinCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for JoinCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JoinCode::parse(s)
    }
}

impl Serialize for JoinCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for JoinCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        JoinCode::parse(&raw).map_err(serde::de::Error::custom)
    }
}
