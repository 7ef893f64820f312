// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for logsense integration tests
//!
//! Provides a mock pricing source and raw-log builders so dispatch can be
//! exercised without a real pricing backend or blockchain connection.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use alloy_primitives::{Address, LogData};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use logsense::{
    ChainName, DateRange, PricePoint, PricingError, PricingSource, QuoteCurrency, RawLogEvent,
    TokenPriceRecord, TransactionContext,
};

/// Mock PricingSource with per-asset canned responses.
///
/// Assets can be configured to succeed with a record, fail with an error,
/// or hang forever (for timeout tests). Unconfigured assets return an
/// empty record list, i.e. "no price available".
///
/// # Example
///
/// ```rust,ignore
/// let source = MockPricingSource::new()
///     .with_price(usdc, 6, "USDC", 1.0)
///     .with_failure(weth);
/// let enrichment = EnrichmentOrchestrator::new(Arc::new(source));
/// ```
pub struct MockPricingSource {
    records: HashMap<Address, Vec<TokenPriceRecord>>,
    failing: HashSet<Address>,
    hanging: HashSet<Address>,
    calls: Mutex<usize>,
}

impl MockPricingSource {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            failing: HashSet::new(),
            hanging: HashSet::new(),
            calls: Mutex::new(0),
        }
    }

    /// Configure a single-record response for `asset`
    pub fn with_price(mut self, asset: Address, decimals: u8, ticker: &str, price: f64) -> Self {
        self.records.insert(
            asset,
            vec![TokenPriceRecord {
                contract_decimals: decimals,
                contract_ticker_symbol: Some(ticker.to_string()),
                logo_url: Some(format!("https://logos.example/{}.png", ticker.to_lowercase())),
                prices: vec![PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                    price,
                }],
            }],
        );
        self
    }

    /// Make lookups for `asset` fail with a request error
    pub fn with_failure(mut self, asset: Address) -> Self {
        self.failing.insert(asset);
        self
    }

    /// Make lookups for `asset` hang until cancelled
    #[allow(dead_code)]
    pub fn with_hang(mut self, asset: Address) -> Self {
        self.hanging.insert(asset);
        self
    }

    /// Number of lookups issued so far
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PricingSource for MockPricingSource {
    async fn token_prices(
        &self,
        _chain: &ChainName,
        _quote: QuoteCurrency,
        asset: Address,
        _range: &DateRange,
    ) -> Result<Vec<TokenPriceRecord>, PricingError> {
        *self.calls.lock().unwrap() += 1;
        if self.hanging.contains(&asset) {
            futures::future::pending::<()>().await;
        }
        if self.failing.contains(&asset) {
            return Err(PricingError::request_failed("simulated outage"));
        }
        Ok(self.records.get(&asset).cloned().unwrap_or_default())
    }
}

/// Raw log carrying an encoded event plus sender metadata
#[allow(dead_code)]
pub fn raw_log(sender_name: &str, sender_address: Address, log_data: LogData) -> RawLogEvent {
    RawLogEvent {
        topics: log_data.topics().to_vec(),
        data: log_data.data.clone(),
        sender_address,
        sender_name: Some(sender_name.to_string()),
        sender_logo_url: Some("https://logos.example/sender.png".to_string()),
        sender_contract_decimals: Some(18),
        sender_contract_ticker_symbol: Some("SND".to_string()),
    }
}

/// Transaction context for a fixed 2024-01-15 block timestamp
#[allow(dead_code)]
pub fn tx_context(chain: &str, logs: Vec<RawLogEvent>) -> TransactionContext {
    TransactionContext {
        block_timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
        chain: ChainName::from(chain),
        logs,
    }
}
