//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are the persistence layer's numeric keys. They are never minted
//! here; the engine only reads them.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a family (the billing unit).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FamilyId(i64);

/// Identifier of a student.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(i64);

macro_rules! impl_numeric_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        /// Decimal form, e.g. `42`. Public invoice tokens are derived from this string.
        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_numeric_id!(FamilyId, "FamilyId");
impl_numeric_id!(StudentId, "StudentId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_plain_decimal() {
        assert_eq!(FamilyId::new(42).to_string(), "42");
        assert_eq!(FamilyId::new(-3).to_string(), "-3");
    }

    #[test]
    fn parse_rejects_non_numeric() {
        assert_eq!("17".parse::<FamilyId>().unwrap(), FamilyId::new(17));
        assert_eq!(" 5 ".parse::<StudentId>().unwrap(), StudentId::new(5));

        let err = "abc".parse::<FamilyId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) if msg.starts_with("FamilyId") => {}
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_string(&FamilyId::new(9)).unwrap();
        assert_eq!(json, "9");
        let back: FamilyId = serde_json::from_str("9").unwrap();
        assert_eq!(back, FamilyId::new(9));
    }
}
