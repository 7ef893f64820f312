// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Token value newtypes used for amount scaling and USD conversion.
//!
//! These types keep raw on-chain integers, human-scaled amounts, per-token
//! prices, and USD values from being confused with one another during
//! normalization.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Raw token amount as stored on-chain, in the token's smallest unit.
///
/// To convert to a human-readable amount, use [`normalize`](Self::normalize)
/// with the token's [`TokenDecimals`].
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use logsense::{TokenAmount, TokenDecimals};
///
/// // 100 USDC (6 decimals)
/// let raw = TokenAmount::new(U256::from(100_000_000u64));
/// let display = raw.normalize(TokenDecimals::new(6));
/// assert_eq!(display.as_f64(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAmount(U256);

impl TokenAmount {
    /// Zero token amount
    pub const ZERO: Self = Self(U256::ZERO);

    /// Create a new token amount from U256
    pub const fn new(amount: U256) -> Self {
        Self(amount)
    }

    /// Get the inner U256 value
    pub const fn as_u256(&self) -> U256 {
        self.0
    }

    /// Normalize by token decimals: `amount / 10^decimals`.
    ///
    /// Converts the raw on-chain integer to human-readable decimal form.
    pub fn normalize(&self, decimals: TokenDecimals) -> NormalizedAmount {
        // U256 has no lossless f64 conversion; go through the decimal string
        let amount = self.0.to_string().parse::<f64>().unwrap_or_else(|e| {
            tracing::warn!(
                amount = %self.0,
                error = %e,
                "Failed to parse token amount to f64, using 0.0"
            );
            0.0
        });
        NormalizedAmount::new(amount / decimals.divisor())
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for TokenAmount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ERC-20 token decimal precision.
///
/// Most tokens use 18 decimals; stablecoins like USDC use 6 and WBTC uses 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenDecimals(u8);

impl TokenDecimals {
    /// Standard decimals for ETH-like tokens (18)
    pub const STANDARD: Self = Self(18);

    /// Create a new decimal precision value
    pub const fn new(decimals: u8) -> Self {
        Self(decimals)
    }

    /// Get the inner u8 value
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    /// Divisor for normalization: `10^decimals`
    pub fn divisor(&self) -> f64 {
        10_f64.powi(self.0 as i32)
    }
}

impl From<u8> for TokenDecimals {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenDecimals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} decimals", self.0)
    }
}

/// Token amount normalized by decimals (human-readable).
///
/// Represents `raw / 10^decimals`, e.g. 1.5 ETH rather than 1.5e18 wei.
/// Normalized amounts are always non-negative; negative inputs are clamped
/// to zero since a token quantity cannot go below it.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedAmount(f64);

impl NormalizedAmount {
    /// Zero normalized amount
    pub const ZERO: Self = Self(0.0);

    /// Create a new normalized amount, clamping negative values to zero
    pub fn new(amount: f64) -> Self {
        Self(amount.max(0.0))
    }

    /// Get the inner f64 value
    pub const fn as_f64(&self) -> f64 {
        self.0
    }

    /// Check if the amount is effectively zero (within epsilon)
    pub fn is_zero(&self) -> bool {
        self.0.abs() < f64::EPSILON
    }
}

impl std::fmt::Display for NormalizedAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Price of one token in the quote currency (USD).
///
/// # Examples
///
/// ```
/// use logsense::{NormalizedAmount, TokenPrice, UsdValue};
///
/// let price = TokenPrice::new(2000.0);
/// let value = price.value_of(NormalizedAmount::new(1.5));
/// assert_eq!(value, UsdValue::new(3000.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenPrice(f64);

impl TokenPrice {
    /// Zero price (no value)
    pub const ZERO: Self = Self(0.0);

    /// Create a new token price
    pub const fn new(price_per_token: f64) -> Self {
        Self(price_per_token)
    }

    /// Get the inner f64 value
    pub const fn as_f64(&self) -> f64 {
        self.0
    }

    /// Check if price is effectively zero (within epsilon)
    pub fn is_zero(&self) -> bool {
        self.0.abs() < f64::EPSILON
    }

    /// USD value of `amount` tokens at this price
    pub fn value_of(&self, amount: NormalizedAmount) -> UsdValue {
        UsdValue::new(amount.as_f64() * self.0)
    }
}

impl From<f64> for TokenPrice {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TokenPrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.6}", self.0)
    }
}

/// A USD-denominated value.
///
/// Distinguishes dollar values from other f64 quantities like normalized
/// amounts or percentages.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsdValue(f64);

impl UsdValue {
    /// Zero USD value
    pub const ZERO: Self = Self(0.0);

    /// Create a new USD value
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the inner f64 value
    pub const fn as_f64(&self) -> f64 {
        self.0
    }

    /// Check if the value is zero
    pub fn is_zero(&self) -> bool {
        self.0.abs() < f64::EPSILON
    }
}

impl From<f64> for UsdValue {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for UsdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}
