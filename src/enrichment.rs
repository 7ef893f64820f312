//! Concurrent pricing enrichment for decoded events.
//!
//! Handlers never talk to a pricing backend directly. They hand the
//! [`EnrichmentOrchestrator`] a set of asset addresses and get back a
//! mapping of whatever lookups succeeded; everything else is absent.
//!
//! # Partial-failure policy
//!
//! One lookup failing (error, timeout, or simply no data) yields an absent
//! entry for that asset only. Even if *all* lookups fail the orchestrator
//! returns an empty mapping rather than an error — handlers degrade by
//! omitting price-derived fields, never by crashing. No retry happens at
//! this layer; retry and backoff are the pricing backend's responsibility.
//!
//! # Concurrency
//!
//! Lookups for distinct assets are independent, so the orchestrator spawns
//! one future per asset and joins them with `futures::future::join_all`
//! (fan-out/fan-in, not a pipeline). A per-lookup timeout bounds any single
//! stuck call so the join can always complete with partial results.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::PricingError;
use crate::types::chain::ChainName;
use crate::types::tokens::{TokenDecimals, TokenPrice};

/// Default bound on a single asset lookup.
const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Currency prices are quoted in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteCurrency {
    #[default]
    Usd,
}

impl std::fmt::Display for QuoteCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteCurrency::Usd => write!(f, "USD"),
        }
    }
}

/// Inclusive date range for a pricing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Range covering a single day
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            from: date,
            to: date,
        }
    }
}

/// One dated price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Per-asset record returned by a pricing backend.
///
/// Mirrors the shape of indexer pricing APIs: contract metadata plus a list
/// of dated prices for the requested range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPriceRecord {
    pub contract_decimals: u8,
    pub contract_ticker_symbol: Option<String>,
    pub logo_url: Option<String>,
    pub prices: Vec<PricePoint>,
}

/// Asynchronous pricing collaborator.
///
/// Implementations wrap whatever transport reaches the pricing service; the
/// orchestrator only needs this one method. An empty result list means "no
/// price available" and is not an error.
#[async_trait]
pub trait PricingSource: Send + Sync {
    /// Price records for one asset on one chain over a date range.
    async fn token_prices(
        &self,
        chain: &ChainName,
        quote: QuoteCurrency,
        asset: Address,
        range: &DateRange,
    ) -> Result<Vec<TokenPriceRecord>, PricingError>;
}

/// Result of one successful asset lookup.
///
/// `unit_price` is absent when the backend knew the asset but had no price
/// for the requested range; the metadata fields are still usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPricing {
    pub decimals: TokenDecimals,
    pub ticker_symbol: Option<String>,
    pub logo_url: Option<String>,
    pub unit_price: Option<TokenPrice>,
}

impl AssetPricing {
    fn from_records(records: Vec<TokenPriceRecord>) -> Option<Self> {
        let record = records.into_iter().next()?;
        Some(Self {
            decimals: TokenDecimals::new(record.contract_decimals),
            ticker_symbol: record.contract_ticker_symbol,
            logo_url: record.logo_url,
            unit_price: record.prices.first().map(|point| TokenPrice::new(point.price)),
        })
    }
}

/// Fans out concurrent pricing lookups and aggregates the results.
///
/// Cheap to clone; clones share the underlying source.
///
/// # Examples
///
/// ```rust,ignore
/// let enrichment = EnrichmentOrchestrator::new(Arc::new(client))
///     .with_lookup_timeout(Duration::from_secs(5));
///
/// let pricing = enrichment
///     .fetch_prices(&chain, &[collateral_asset, debt_asset], tx.price_date())
///     .await;
/// // Entries are absent for assets whose lookup failed; check before use.
/// if let Some(collateral) = pricing.get(&collateral_asset) { /* ... */ }
/// ```
#[derive(Clone)]
pub struct EnrichmentOrchestrator {
    source: Arc<dyn PricingSource>,
    quote: QuoteCurrency,
    lookup_timeout: Duration,
}

impl EnrichmentOrchestrator {
    /// Create an orchestrator over a pricing source, quoting in USD
    pub fn new(source: Arc<dyn PricingSource>) -> Self {
        Self {
            source,
            quote: QuoteCurrency::Usd,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Override the per-lookup timeout
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Fetch prices for a set of assets concurrently.
    ///
    /// Issues one lookup per distinct asset and waits for all of them to
    /// complete or fail. Assets whose lookup failed, timed out, or returned
    /// no records are absent from the mapping.
    pub async fn fetch_prices(
        &self,
        chain: &ChainName,
        assets: &[Address],
        range: DateRange,
    ) -> HashMap<Address, AssetPricing> {
        let distinct: HashSet<Address> = assets.iter().copied().collect();

        let lookups = distinct
            .into_iter()
            .map(|asset| async move {
                (asset, self.lookup_one(chain, asset, &range).await)
            })
            .collect::<Vec<_>>();

        let mut results = HashMap::new();
        for (asset, pricing) in join_all(lookups).await {
            if let Some(pricing) = pricing {
                results.insert(asset, pricing);
            }
        }

        debug!(
            chain = %chain,
            requested = assets.len(),
            resolved = results.len(),
            "Completed pricing fan-out"
        );
        results
    }

    /// Convenience wrapper for a single-asset lookup
    pub async fn fetch_price(
        &self,
        chain: &ChainName,
        asset: Address,
        range: DateRange,
    ) -> Option<AssetPricing> {
        self.lookup_one(chain, asset, &range).await
    }

    async fn lookup_one(
        &self,
        chain: &ChainName,
        asset: Address,
        range: &DateRange,
    ) -> Option<AssetPricing> {
        let lookup = self.source.token_prices(chain, self.quote, asset, range);
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(records)) => {
                let pricing = AssetPricing::from_records(records);
                if pricing.is_none() {
                    debug!(chain = %chain, asset = %asset, "No price data for asset");
                }
                pricing
            }
            Ok(Err(e)) => {
                warn!(
                    chain = %chain,
                    asset = %asset,
                    error = %e,
                    "Pricing lookup failed, omitting asset"
                );
                None
            }
            Err(_) => {
                warn!(
                    chain = %chain,
                    asset = %asset,
                    timeout_ms = self.lookup_timeout.as_millis(),
                    "Pricing lookup timed out, omitting asset"
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for EnrichmentOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentOrchestrator")
            .field("quote", &self.quote)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_records_takes_first() {
        let records = vec![
            TokenPriceRecord {
                contract_decimals: 6,
                contract_ticker_symbol: Some("USDC".to_string()),
                logo_url: None,
                prices: vec![PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                    price: 1.0,
                }],
            },
            TokenPriceRecord {
                contract_decimals: 18,
                contract_ticker_symbol: Some("WETH".to_string()),
                logo_url: None,
                prices: vec![],
            },
        ];
        let pricing = AssetPricing::from_records(records).unwrap();
        assert_eq!(pricing.decimals, TokenDecimals::new(6));
        assert_eq!(pricing.unit_price, Some(TokenPrice::new(1.0)));
    }

    #[test]
    fn test_from_records_empty_is_absent() {
        assert!(AssetPricing::from_records(vec![]).is_none());
    }

    #[test]
    fn test_from_records_without_prices_keeps_metadata() {
        let records = vec![TokenPriceRecord {
            contract_decimals: 8,
            contract_ticker_symbol: Some("WBTC".to_string()),
            logo_url: None,
            prices: vec![],
        }];
        let pricing = AssetPricing::from_records(records).unwrap();
        assert!(pricing.unit_price.is_none());
        assert_eq!(pricing.ticker_symbol.as_deref(), Some("WBTC"));
    }

    #[test]
    fn test_quote_currency_display() {
        assert_eq!(QuoteCurrency::Usd.to_string(), "USD");
    }
}
