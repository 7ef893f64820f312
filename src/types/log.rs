// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Read-only input types: raw logs and transaction context.
//!
//! These are assembled externally from a node or indexer data source and
//! passed into the dispatch engine; logsense never fetches transactions
//! itself.

use alloy_primitives::{Address, Bytes, B256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chain::ChainName;
use crate::enrichment::DateRange;

/// A single raw log entry emitted by a contract, plus the sender metadata
/// the upstream indexer attaches to it.
///
/// `topics[0]`, when present, is the event signature hash used to match the
/// log against registered schemas. The sender fields describe the emitting
/// contract and are used both for protocol resolution and as a metadata
/// fallback when pricing enrichment has no data for an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLogEvent {
    /// Indexed topic hashes; the first conventionally identifies the event
    pub topics: Vec<B256>,
    /// Non-indexed event data
    pub data: Bytes,
    /// Address of the emitting contract
    pub sender_address: Address,
    /// Display name of the emitting contract, if known
    pub sender_name: Option<String>,
    /// Logo URL of the emitting contract, if known
    pub sender_logo_url: Option<String>,
    /// Decimals of the emitting contract, when it is a token
    pub sender_contract_decimals: Option<u8>,
    /// Ticker symbol of the emitting contract, when it is a token
    pub sender_contract_ticker_symbol: Option<String>,
}

impl RawLogEvent {
    /// The event signature topic, if the log has any topics
    pub fn topic0(&self) -> Option<&B256> {
        self.topics.first()
    }
}

/// Read-only context for one transaction's worth of logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionContext {
    /// Timestamp of the block the transaction was included in
    pub block_timestamp: DateTime<Utc>,
    /// Chain the transaction executed on
    pub chain: ChainName,
    /// Logs emitted by the transaction, in emission order
    pub logs: Vec<RawLogEvent>,
}

impl TransactionContext {
    /// Single-day pricing range derived from the block timestamp.
    ///
    /// Handlers use this to ask the pricing source for the asset's price on
    /// the day the transaction was mined.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use logsense::{ChainName, TransactionContext};
    ///
    /// let tx = TransactionContext {
    ///     block_timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap(),
    ///     chain: ChainName::from("eth-mainnet"),
    ///     logs: vec![],
    /// };
    /// let range = tx.price_date();
    /// assert_eq!(range.from, range.to);
    /// assert_eq!(range.from.to_string(), "2024-03-15");
    /// ```
    pub fn price_date(&self) -> DateRange {
        DateRange::single_day(self.block_timestamp.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn log(topics: Vec<B256>) -> RawLogEvent {
        RawLogEvent {
            topics,
            data: Bytes::new(),
            sender_address: Address::ZERO,
            sender_name: None,
            sender_logo_url: None,
            sender_contract_decimals: None,
            sender_contract_ticker_symbol: None,
        }
    }

    #[test]
    fn test_topic0_of_empty_log() {
        assert!(log(vec![]).topic0().is_none());
    }

    #[test]
    fn test_topic0_is_first_topic() {
        let first = B256::repeat_byte(0xaa);
        let entry = log(vec![first, B256::repeat_byte(0xbb)]);
        assert_eq!(entry.topic0(), Some(&first));
    }

    #[test]
    fn test_price_date_is_single_day() {
        let tx = TransactionContext {
            block_timestamp: Utc.with_ymd_and_hms(2023, 11, 7, 23, 59, 59).unwrap(),
            chain: ChainName::from("eth-mainnet"),
            logs: vec![],
        };
        let range = tx.price_date();
        assert_eq!(range.from, range.to);
        assert_eq!(range.from.to_string(), "2023-11-07");
    }
}
