//! Public invoice tokens.
//!
//! A token is the first 8 hex characters of SHA-256 over the family id's
//! decimal string. It is unsalted and deterministic: an obfuscated link
//! handle, not a secret.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use coopbill_core::{DomainError, FamilyId};

pub const TOKEN_LEN: usize = 8;

/// An 8-character lowercase hex token for a public invoice/schedule link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FamilyToken(String);

impl FamilyToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for FamilyToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for FamilyToken {
    type Err = DomainError;

    /// Exact form only: 8 chars of `[0-9a-f]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = s.len() == TOKEN_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if well_formed {
            Ok(Self(s.to_string()))
        } else {
            Err(DomainError::invalid_id(format!(
                "FamilyToken: expected {TOKEN_LEN} lowercase hex characters"
            )))
        }
    }
}

impl TryFrom<String> for FamilyToken {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FamilyToken> for String {
    fn from(value: FamilyToken) -> Self {
        value.0
    }
}

/// Token for `family_id`.
pub fn hash_for_family(family_id: FamilyId) -> FamilyToken {
    let digest = Sha256::digest(family_id.to_string().as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(TOKEN_LEN);
    FamilyToken(hex)
}

/// Linear scan: the first id in `family_ids` whose token matches.
pub fn resolve<I>(token: &FamilyToken, family_ids: I) -> Option<FamilyId>
where
    I: IntoIterator<Item = FamilyId>,
{
    family_ids
        .into_iter()
        .find(|&id| hash_for_family(id) == *token)
}

/// Reverse index token → family id, built once per family set.
///
/// Resolves exactly as [`resolve`] does over the same ids in the same order:
/// on a token collision the earlier id wins.
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    by_token: HashMap<FamilyToken, FamilyId>,
}

impl TokenIndex {
    pub fn build<I>(family_ids: I) -> Self
    where
        I: IntoIterator<Item = FamilyId>,
    {
        let mut by_token = HashMap::new();
        for id in family_ids {
            match by_token.entry(hash_for_family(id)) {
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
                Entry::Occupied(existing) => {
                    warn!(
                        token = %existing.key(),
                        kept = %existing.get(),
                        shadowed = %id,
                        "public token collision"
                    );
                }
            }
        }
        Self { by_token }
    }

    pub fn resolve(&self, token: &FamilyToken) -> Option<FamilyId> {
        self.by_token.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}

impl FromIterator<FamilyId> for TokenIndex {
    fn from_iter<I: IntoIterator<Item = FamilyId>>(iter: I) -> Self {
        Self::build(iter)
    }
}
