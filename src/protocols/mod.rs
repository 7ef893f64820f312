// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Bundled protocol decoder modules.
//!
//! Each module exposes one `register` function that adds its schemas and
//! handlers to a [`DecoderRegistry`]. Registration is an explicit startup
//! step — call [`register_all`] (or individual module `register` functions)
//! on a registry you own, then hand the registry to the dispatch engine.
//! Nothing here registers itself through global state.

pub mod aave_v3;
pub mod erc20;
pub mod grindery_one;
pub mod uniswap_v2;

use crate::errors::RegistryError;
use crate::registry::DecoderRegistry;

/// Register every bundled protocol module.
///
/// Fails fast on the first conflicting or invalid registration; a failure
/// here is a packaging bug to fix before serving traffic.
///
/// # Examples
///
/// ```
/// use logsense::DecoderRegistry;
///
/// let mut registry = DecoderRegistry::new();
/// logsense::protocols::register_all(&mut registry).unwrap();
/// assert!(!registry.is_empty());
/// ```
pub fn register_all(registry: &mut DecoderRegistry) -> Result<(), RegistryError> {
    aave_v3::register(registry)?;
    erc20::register(registry)?;
    grindery_one::register(registry)?;
    uniswap_v2::register(registry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_succeeds() {
        let mut registry = DecoderRegistry::new();
        register_all(&mut registry).unwrap();
        assert!(registry.len() >= 10);
    }

    #[test]
    fn test_register_all_twice_conflicts() {
        let mut registry = DecoderRegistry::new();
        register_all(&mut registry).unwrap();
        assert!(matches!(
            register_all(&mut registry),
            Err(RegistryError::Conflict { .. })
        ));
    }
}
