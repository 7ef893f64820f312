//! Chain and protocol identity types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;

/// Name of a blockchain network, e.g. `eth-mainnet` or `matic-mainnet`.
///
/// Chain identity follows the upstream indexer's string naming scheme rather
/// than numeric chain ids, since registrations and transaction contexts both
/// arrive with these names attached.
///
/// # Examples
///
/// ```
/// use logsense::ChainName;
///
/// let chain = ChainName::from("eth-mainnet");
/// assert_eq!(chain.as_str(), "eth-mainnet");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainName(String);

impl ChainName {
    /// Create a new chain name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the chain name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ChainName {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ChainName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for ChainName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a protocol whose events the registry can decode.
///
/// Protocol ids are short kebab-case slugs (`aave-v3`, `uniswap-v2`) used as
/// the first half of a [`DecoderKey`](crate::DecoderKey).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolId(String);

impl ProtocolId {
    /// Create a new protocol id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the protocol id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProtocolId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for ProtocolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of chains a registration is valid for.
///
/// A scope is always non-empty; [`ChainScope::new`] rejects an empty set so
/// that a registration can never exist without at least one chain it serves.
///
/// # Examples
///
/// ```
/// use logsense::{ChainName, ChainScope};
///
/// let scope = ChainScope::new(["eth-mainnet", "matic-mainnet"]).unwrap();
/// assert!(scope.contains(&ChainName::from("eth-mainnet")));
/// assert!(!scope.contains(&ChainName::from("base-mainnet")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainScope(BTreeSet<ChainName>);

impl ChainScope {
    /// Create a scope from a non-empty collection of chain names.
    ///
    /// Returns [`RegistryError::EmptyScope`] if the collection is empty.
    pub fn new<I, C>(chains: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = C>,
        C: Into<ChainName>,
    {
        let set: BTreeSet<ChainName> = chains.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return Err(RegistryError::EmptyScope);
        }
        Ok(Self(set))
    }

    /// Create a scope containing a single chain
    pub fn single(chain: impl Into<ChainName>) -> Self {
        Self(BTreeSet::from([chain.into()]))
    }

    /// Whether this scope covers `chain`
    pub fn contains(&self, chain: &ChainName) -> bool {
        self.0.contains(chain)
    }

    /// Whether this scope shares any chain with `other`
    pub fn intersects(&self, other: &ChainScope) -> bool {
        self.0.intersection(&other.0).next().is_some()
    }

    /// Chains shared with `other`, in sorted order
    pub fn intersection(&self, other: &ChainScope) -> Vec<ChainName> {
        self.0.intersection(&other.0).cloned().collect()
    }

    /// Iterate over the chains in this scope, in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &ChainName> {
        self.0.iter()
    }

    /// Number of chains in this scope
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; scopes are non-empty by construction
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ChainScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for chain in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{chain}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scope_rejected() {
        let chains: Vec<&str> = vec![];
        assert!(matches!(
            ChainScope::new(chains),
            Err(RegistryError::EmptyScope)
        ));
    }

    #[test]
    fn test_scope_contains() {
        let scope = ChainScope::new(["eth-mainnet", "matic-mainnet"]).unwrap();
        assert!(scope.contains(&ChainName::from("eth-mainnet")));
        assert!(scope.contains(&ChainName::from("matic-mainnet")));
        assert!(!scope.contains(&ChainName::from("base-mainnet")));
    }

    #[test]
    fn test_scope_intersection() {
        let a = ChainScope::new(["eth-mainnet", "base-mainnet"]).unwrap();
        let b = ChainScope::new(["base-mainnet", "matic-mainnet"]).unwrap();
        let c = ChainScope::single("avalanche-mainnet");

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert_eq!(a.intersection(&b), vec![ChainName::from("base-mainnet")]);
    }

    #[test]
    fn test_scope_deduplicates() {
        let scope = ChainScope::new(["eth-mainnet", "eth-mainnet"]).unwrap();
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn test_display_formatting() {
        let scope = ChainScope::new(["matic-mainnet", "eth-mainnet"]).unwrap();
        // BTreeSet keeps chains sorted
        assert_eq!(format!("{scope}"), "eth-mainnet, matic-mainnet");
    }
}
