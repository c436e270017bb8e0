//! Account identities for the ledger
//!
//! An account is addressed by an opaque string token (e.g. a public
//! address). The ledger interprets nothing beyond equality — identities
//! are supplied by an external identity source and trusted as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identity of a ledger participant.
///
/// Any distinct string is a valid account; accounts need no registration
/// and exist implicitly with a zero balance until credited.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account identity from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The underlying address string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
