// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end dispatch tests
//!
//! Exercises the full pipeline — protocol resolution, signature matching,
//! schema decode, enrichment, normalization — against the bundled protocol
//! modules, with logs encoded through `alloy-sol-types` and prices served
//! by a mock source.

mod helpers;

use std::sync::Arc;

use alloy_primitives::{address, Address, B256, U256};
use alloy_sol_types::{sol, SolEvent};
use helpers::{raw_log, tx_context, MockPricingSource};
use logsense::{
    DecodedAction, DecoderRegistry, DispatchEngine, DispatchError, EnrichmentOrchestrator,
    EventCategory, ProtocolId,
};

sol! {
    event Borrow(
        address indexed reserve,
        address user,
        address indexed onBehalfOf,
        uint256 amount,
        uint8 interestRateMode,
        uint256 borrowRate,
        uint16 indexed referralCode
    );

    event Transfer(address indexed from, address indexed to, uint256 value);

    event LiquidationCall(
        address indexed collateralAsset,
        address indexed debtAsset,
        address indexed user,
        uint256 debtToCover,
        uint256 liquidatedCollateralAmount,
        address liquidator,
        bool receiveAToken
    );
}

const AAVE_POOL: Address = address!("87870bca3f3fd6335c3f4ce8392d69350b4fa4e2");
const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
const USER: Address = address!("1111111111111111111111111111111111111111");

fn engine_with(source: MockPricingSource) -> DispatchEngine {
    let mut registry = DecoderRegistry::new();
    logsense::protocols::register_all(&mut registry).unwrap();
    DispatchEngine::new(
        Arc::new(registry),
        EnrichmentOrchestrator::new(Arc::new(source)),
    )
}

fn borrow_log_data(amount: u64) -> alloy_primitives::LogData {
    Borrow {
        reserve: USDC,
        user: USER,
        onBehalfOf: USER,
        amount: U256::from(amount),
        interestRateMode: 2,
        borrowRate: U256::from(52_500_000_000_000_000_000_000_000u128),
        referralCode: 0,
    }
    .encode_log_data()
}

#[tokio::test]
async fn borrow_normalizes_with_price() {
    let engine = engine_with(MockPricingSource::new().with_price(USDC, 6, "USDC", 1.0));
    let log = raw_log("Aave V3", AAVE_POOL, borrow_log_data(1_000_000));
    let tx = tx_context("eth-mainnet", vec![log.clone()]);

    let event = engine.dispatch(&log, &tx).await.unwrap();

    assert_eq!(event.name, "Borrow");
    assert_eq!(event.action, DecodedAction::Transferred);
    assert_eq!(event.category, EventCategory::Lending);
    assert_eq!(event.protocol.name, "Aave V3");

    // Details keep handler construction order
    let titles: Vec<&str> = event.details.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Reserve",
            "User",
            "On Behalf Of",
            "Borrow Rate",
            "Interest Rate Mode",
            "Referral Code",
        ]
    );
    assert_eq!(event.details[3].value, "5.25 %");
    assert_eq!(event.details[4].value, "Variable");

    // 1_000_000 raw units of a 6-decimal asset at $1.00
    let token = &event.tokens[0];
    assert_eq!(token.heading, "Borrow Amount");
    assert_eq!(token.value, "1000000");
    assert_eq!(token.pretty_quote.as_deref(), Some("$1.00"));
    assert_eq!(token.ticker_symbol.as_deref(), Some("USDC"));
}

#[tokio::test]
async fn borrow_without_price_omits_quote() {
    let engine = engine_with(MockPricingSource::new());
    let log = raw_log("Aave V3", AAVE_POOL, borrow_log_data(1_000_000));
    let tx = tx_context("eth-mainnet", vec![log.clone()]);

    let event = engine.dispatch(&log, &tx).await.unwrap();
    assert!(event.tokens[0].pretty_quote.is_none());
    assert_eq!(event.tokens[0].value, "1000000");
}

#[tokio::test]
async fn unknown_sender_is_unrecognized() {
    let source = Arc::new(MockPricingSource::new());
    let mut registry = DecoderRegistry::new();
    logsense::protocols::register_all(&mut registry).unwrap();
    let engine = DispatchEngine::new(
        Arc::new(registry),
        EnrichmentOrchestrator::new(source.clone()),
    );

    let log = raw_log("Some Unknown Contract", USER, borrow_log_data(1));
    let tx = tx_context("eth-mainnet", vec![log.clone()]);

    let err = engine.dispatch(&log, &tx).await.unwrap_err();
    assert!(err.is_unrecognized());
    // The handler path was never reached, so no pricing lookup happened
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn unknown_signature_is_unrecognized() {
    let engine = engine_with(MockPricingSource::new());

    let mut log = raw_log("Aave V3", AAVE_POOL, borrow_log_data(1));
    log.topics[0] = B256::repeat_byte(0x42);
    let tx = tx_context("eth-mainnet", vec![log.clone()]);

    assert!(engine.dispatch(&log, &tx).await.unwrap_err().is_unrecognized());
}

#[tokio::test]
async fn known_event_on_wrong_chain_is_unsupported() {
    // grindery-one:Transfer is registered for matic-mainnet only
    let engine = engine_with(MockPricingSource::new());

    let transfer = Transfer {
        from: USER,
        to: AAVE_POOL,
        value: U256::from(42u64),
    }
    .encode_log_data();
    let log = raw_log("Grindery One", USER, transfer);
    let tx = tx_context("eth-mainnet", vec![log.clone()]);

    match engine.dispatch(&log, &tx).await.unwrap_err() {
        DispatchError::UnsupportedChain {
            protocol,
            event,
            chain,
        } => {
            assert_eq!(protocol, ProtocolId::from("grindery-one"));
            assert_eq!(event, "Transfer");
            assert_eq!(chain.as_str(), "eth-mainnet");
        }
        other => panic!("expected UnsupportedChain, got {other:?}"),
    }
}

#[tokio::test]
async fn truncated_data_is_decode_failure_and_siblings_survive() {
    let engine = engine_with(MockPricingSource::new().with_price(USDC, 6, "USDC", 1.0));

    let mut bad = raw_log("Aave V3", AAVE_POOL, borrow_log_data(1_000_000));
    bad.data = alloy_primitives::Bytes::from(bad.data[..16].to_vec()); // chop the body mid-word
    let good = raw_log("Aave V3", AAVE_POOL, borrow_log_data(2_000_000));
    let tx = tx_context("eth-mainnet", vec![bad, good]);

    let outcomes = engine.dispatch_transaction(&tx).await;
    assert_eq!(outcomes.len(), 2);
    assert!(matches!(
        outcomes[0],
        Err(DispatchError::DecodeFailure { .. })
    ));
    let event = outcomes[1].as_ref().unwrap();
    assert_eq!(event.tokens[0].value, "2000000");
}

#[tokio::test]
async fn grindery_transfer_never_calls_pricing() {
    let source = Arc::new(MockPricingSource::new());
    let mut registry = DecoderRegistry::new();
    logsense::protocols::register_all(&mut registry).unwrap();
    let engine = DispatchEngine::new(
        Arc::new(registry),
        EnrichmentOrchestrator::new(source.clone()),
    );

    let transfer = Transfer {
        from: USER,
        to: AAVE_POOL,
        value: U256::from(1_500u64),
    }
    .encode_log_data();
    let log = raw_log("Grindery One", USER, transfer);
    let tx = tx_context("matic-mainnet", vec![log.clone()]);

    let event = engine.dispatch(&log, &tx).await.unwrap();
    assert_eq!(event.action, DecodedAction::Swapped);
    assert_eq!(event.category, EventCategory::Dex);
    assert_eq!(event.tokens[0].value, "1500");
    assert!(event.tokens[0].pretty_quote.is_none());
    // Built entirely from sender metadata
    assert_eq!(event.tokens[0].ticker_symbol.as_deref(), Some("SND"));
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn erc20_transfer_falls_back_to_sender_metadata() {
    let engine = engine_with(MockPricingSource::new());

    let transfer = Transfer {
        from: USER,
        to: AAVE_POOL,
        value: U256::from(7u64),
    }
    .encode_log_data();
    let log = raw_log("ERC20 Token", WETH, transfer);
    let tx = tx_context("eth-mainnet", vec![log.clone()]);

    let event = engine.dispatch(&log, &tx).await.unwrap();
    assert_eq!(event.category, EventCategory::Token);
    let token = &event.tokens[0];
    assert!(token.pretty_quote.is_none());
    assert_eq!(token.ticker_symbol.as_deref(), Some("SND"));
    assert_eq!(token.decimals.map(|d| d.as_u8()), Some(18));
}

#[tokio::test]
async fn liquidation_tolerates_partial_enrichment() {
    // Collateral asset prices fine, debt asset lookup fails
    let engine = engine_with(
        MockPricingSource::new()
            .with_price(WETH, 18, "WETH", 2000.0)
            .with_failure(USDC),
    );

    let liquidation = LiquidationCall {
        collateralAsset: WETH,
        debtAsset: USDC,
        user: USER,
        debtToCover: U256::from(5_000_000u64),
        liquidatedCollateralAmount: U256::from(1_000_000_000_000_000_000u64), // 1 WETH
        liquidator: AAVE_POOL,
        receiveAToken: false,
    }
    .encode_log_data();
    let log = raw_log("Aave V3", AAVE_POOL, liquidation);
    let tx = tx_context("eth-mainnet", vec![log.clone()]);

    let event = engine.dispatch(&log, &tx).await.unwrap();

    let headings: Vec<&str> = event.tokens.iter().map(|t| t.heading.as_str()).collect();
    assert_eq!(headings, vec!["Collateral Amount", "Debt Amount"]);

    assert_eq!(event.tokens[0].pretty_quote.as_deref(), Some("$2,000.00"));
    assert!(event.tokens[1].pretty_quote.is_none());
    assert_eq!(event.tokens[1].value, "5000000");
}

#[tokio::test]
async fn dispatch_is_deterministic() {
    let engine = engine_with(MockPricingSource::new().with_price(USDC, 6, "USDC", 1.0));
    let log = raw_log("Aave V3", AAVE_POOL, borrow_log_data(1_000_000));
    let tx = tx_context("eth-mainnet", vec![log.clone()]);

    let first = engine.dispatch(&log, &tx).await.unwrap();
    let second = engine.dispatch(&log, &tx).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn transaction_outcomes_are_per_log_and_ordered() {
    let engine = engine_with(MockPricingSource::new().with_price(USDC, 6, "USDC", 1.0));

    let borrow = raw_log("Aave V3", AAVE_POOL, borrow_log_data(1_000_000));
    let unknown = raw_log("Mystery Contract", USER, borrow_log_data(1));
    let transfer = Transfer {
        from: USER,
        to: AAVE_POOL,
        value: U256::from(9u64),
    }
    .encode_log_data();
    let erc20 = raw_log("ERC20 Token", WETH, transfer);

    let tx = tx_context("eth-mainnet", vec![borrow, unknown, erc20]);
    let outcomes = engine.dispatch_transaction(&tx).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].as_ref().unwrap().name, "Borrow");
    assert!(outcomes[1].as_ref().unwrap_err().is_unrecognized());
    assert_eq!(outcomes[2].as_ref().unwrap().name, "Transfer");
}
