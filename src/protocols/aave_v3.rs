//! Aave V3 pool event decoders.
//!
//! Covers the lending lifecycle events the Aave V3 pool contract emits:
//! Supply, Borrow, Repay, Withdraw, FlashLoan, and LiquidationCall.
//! Interest rates arrive ray-scaled (27 decimals) and are rendered as
//! percentages.

use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;

use crate::errors::{HandlerError, RegistryError};
use crate::handler::{EventHandler, HandlerContext};
use crate::normalize::prettify_number;
use crate::registry::{DecoderKey, DecoderRegistry, ProtocolInfo};
use crate::schema::{EventField, EventSchema};
use crate::types::chain::ChainScope;
use crate::types::event::{
    DecodedAction, EventCategory, EventDetail, EventToken, NormalizedEvent, ProtocolMeta,
};
use crate::types::log::RawLogEvent;
use crate::types::tokens::TokenAmount;

const PROTOCOL: &str = "aave-v3";
const PROTOCOL_NAME: &str = "Aave V3";

const DEPLOYED_CHAINS: [&str; 8] = [
    "eth-mainnet",
    "avalanche-mainnet",
    "arbitrum-mainnet",
    "optimism-mainnet",
    "matic-mainnet",
    "metis-mainnet",
    "base-mainnet",
    "bsc-mainnet",
];

/// Register the Aave V3 decoders.
pub fn register(registry: &mut DecoderRegistry) -> Result<(), RegistryError> {
    registry.register_protocol(ProtocolInfo::new(
        PROTOCOL,
        ["Aave", "Aave V3", "AAVE-V3", "Aave: Pool V3"],
    ));

    let entries: [(EventSchema, Arc<dyn EventHandler>); 6] = [
        (borrow_schema()?, Arc::new(BorrowHandler)),
        (flash_loan_schema()?, Arc::new(FlashLoanHandler)),
        (liquidation_call_schema()?, Arc::new(LiquidationCallHandler)),
        (repay_schema()?, Arc::new(RepayHandler)),
        (supply_schema()?, Arc::new(SupplyHandler)),
        (withdraw_schema()?, Arc::new(WithdrawHandler)),
    ];
    for (schema, handler) in entries {
        registry.register(
            DecoderKey::new(PROTOCOL, schema.name()),
            ChainScope::new(DEPLOYED_CHAINS)?,
            schema,
            handler,
        )?;
    }
    Ok(())
}

fn protocol_meta(log: &RawLogEvent) -> ProtocolMeta {
    ProtocolMeta {
        logo: log.sender_logo_url.clone(),
        name: PROTOCOL_NAME.to_string(),
    }
}

/// Render a ray-scaled (1e27) interest rate as a percentage, e.g. `5.25 %`.
fn ray_rate_percent(rate: U256) -> String {
    let rate = rate.to_string().parse::<f64>().unwrap_or(0.0);
    format!("{} %", prettify_number(rate / 1e27 * 100.0))
}

fn interest_rate_mode_label(mode: U256) -> &'static str {
    match mode.saturating_to::<u64>() {
        0 => "None",
        1 => "Stable",
        2 => "Variable",
        _ => "Unknown",
    }
}

fn borrow_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "Borrow",
        vec![
            EventField::indexed("reserve", "address"),
            EventField::new("user", "address"),
            EventField::indexed("onBehalfOf", "address"),
            EventField::new("amount", "uint256"),
            EventField::new("interestRateMode", "uint8"),
            EventField::new("borrowRate", "uint256"),
            EventField::indexed("referralCode", "uint16"),
        ],
    )
}

struct BorrowHandler;

#[async_trait]
impl EventHandler for BorrowHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let reserve = cx.decoded.address("reserve")?;
        let amount = TokenAmount::new(cx.decoded.uint("amount")?);

        let details = vec![
            EventDetail::address("Reserve", reserve),
            EventDetail::address("User", cx.decoded.address("user")?),
            EventDetail::address("On Behalf Of", cx.decoded.address("onBehalfOf")?),
            EventDetail::text("Borrow Rate", ray_rate_percent(cx.decoded.uint("borrowRate")?)),
            EventDetail::text(
                "Interest Rate Mode",
                interest_rate_mode_label(cx.decoded.uint("interestRateMode")?),
            ),
            EventDetail::text("Referral Code", cx.decoded.uint("referralCode")?.to_string()),
        ];

        let pricing = cx
            .enrichment
            .fetch_price(cx.chain, reserve, cx.tx.price_date())
            .await;
        let token = match &pricing {
            Some(pricing) => EventToken::priced("Borrow Amount", amount, pricing),
            None => EventToken::unpriced("Borrow Amount", amount, None, None, None),
        };

        Ok(NormalizedEvent {
            action: DecodedAction::Transferred,
            category: EventCategory::Lending,
            name: "Borrow".to_string(),
            protocol: protocol_meta(cx.log),
            details,
            tokens: vec![token],
        })
    }
}

fn flash_loan_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "FlashLoan",
        vec![
            EventField::indexed("target", "address"),
            EventField::new("initiator", "address"),
            EventField::indexed("asset", "address"),
            EventField::new("amount", "uint256"),
            EventField::new("interestRateMode", "uint8"),
            EventField::new("premium", "uint256"),
            EventField::indexed("referralCode", "uint16"),
        ],
    )
}

struct FlashLoanHandler;

#[async_trait]
impl EventHandler for FlashLoanHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let asset = cx.decoded.address("asset")?;
        let amount = TokenAmount::new(cx.decoded.uint("amount")?);
        let premium = TokenAmount::new(cx.decoded.uint("premium")?);

        let details = vec![
            EventDetail::address("Target", cx.decoded.address("target")?),
            EventDetail::address("Initiator", cx.decoded.address("initiator")?),
            EventDetail::address("Asset", asset),
            EventDetail::text(
                "Interest Rate Mode",
                interest_rate_mode_label(cx.decoded.uint("interestRateMode")?),
            ),
        ];

        let pricing = cx
            .enrichment
            .fetch_price(cx.chain, asset, cx.tx.price_date())
            .await;
        let tokens = match &pricing {
            Some(pricing) => vec![
                EventToken::priced("Flash Loan Amount", amount, pricing),
                EventToken::priced("Flash Loan Premium", premium, pricing),
            ],
            None => vec![
                EventToken::unpriced("Flash Loan Amount", amount, None, None, None),
                EventToken::unpriced("Flash Loan Premium", premium, None, None, None),
            ],
        };

        Ok(NormalizedEvent {
            action: DecodedAction::Transferred,
            category: EventCategory::Lending,
            name: "Flash Loan".to_string(),
            protocol: protocol_meta(cx.log),
            details,
            tokens,
        })
    }
}

fn liquidation_call_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "LiquidationCall",
        vec![
            EventField::indexed("collateralAsset", "address"),
            EventField::indexed("debtAsset", "address"),
            EventField::indexed("user", "address"),
            EventField::new("debtToCover", "uint256"),
            EventField::new("liquidatedCollateralAmount", "uint256"),
            EventField::new("liquidator", "address"),
            EventField::new("receiveAToken", "bool"),
        ],
    )
}

struct LiquidationCallHandler;

#[async_trait]
impl EventHandler for LiquidationCallHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let collateral_asset = cx.decoded.address("collateralAsset")?;
        let debt_asset = cx.decoded.address("debtAsset")?;
        let collateral_amount =
            TokenAmount::new(cx.decoded.uint("liquidatedCollateralAmount")?);
        let debt_amount = TokenAmount::new(cx.decoded.uint("debtToCover")?);

        let details = vec![
            EventDetail::address("Collateral Asset", collateral_asset),
            EventDetail::address("Debt Asset", debt_asset),
            EventDetail::address("User", cx.decoded.address("user")?),
            EventDetail::address("Liquidator", cx.decoded.address("liquidator")?),
            EventDetail::text(
                "Receive A Token",
                if cx.decoded.boolean("receiveAToken")? {
                    "Yes"
                } else {
                    "No"
                },
            ),
        ];

        // Both assets priced in one concurrent fan-out; either may be absent.
        let pricing = cx
            .enrichment
            .fetch_prices(
                cx.chain,
                &[collateral_asset, debt_asset],
                cx.tx.price_date(),
            )
            .await;
        let token_entry = |heading: &str, amount: TokenAmount, asset| match pricing.get(&asset) {
            Some(asset_pricing) => EventToken::priced(heading, amount, asset_pricing),
            None => EventToken::unpriced(heading, amount, None, None, None),
        };
        let tokens = vec![
            token_entry("Collateral Amount", collateral_amount, collateral_asset),
            token_entry("Debt Amount", debt_amount, debt_asset),
        ];

        Ok(NormalizedEvent {
            action: DecodedAction::Transferred,
            category: EventCategory::Lending,
            name: "Liquidation Call".to_string(),
            protocol: protocol_meta(cx.log),
            details,
            tokens,
        })
    }
}

fn repay_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "Repay",
        vec![
            EventField::indexed("reserve", "address"),
            EventField::indexed("user", "address"),
            EventField::indexed("repayer", "address"),
            EventField::new("amount", "uint256"),
            EventField::new("useATokens", "bool"),
        ],
    )
}

struct RepayHandler;

#[async_trait]
impl EventHandler for RepayHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let reserve = cx.decoded.address("reserve")?;
        let amount = TokenAmount::new(cx.decoded.uint("amount")?);

        let details = vec![
            EventDetail::address("Reserve", reserve),
            EventDetail::address("User", cx.decoded.address("user")?),
            EventDetail::address("Repayer", cx.decoded.address("repayer")?),
            EventDetail::text(
                "Use A Tokens",
                if cx.decoded.boolean("useATokens")? {
                    "Yes"
                } else {
                    "No"
                },
            ),
        ];

        let pricing = cx
            .enrichment
            .fetch_price(cx.chain, reserve, cx.tx.price_date())
            .await;
        let token = match &pricing {
            Some(pricing) => EventToken::priced("Repay Amount", amount, pricing),
            None => EventToken::unpriced("Repay Amount", amount, None, None, None),
        };

        Ok(NormalizedEvent {
            action: DecodedAction::Transferred,
            category: EventCategory::Lending,
            name: "Repay".to_string(),
            protocol: protocol_meta(cx.log),
            details,
            tokens: vec![token],
        })
    }
}

fn supply_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "Supply",
        vec![
            EventField::indexed("reserve", "address"),
            EventField::new("user", "address"),
            EventField::indexed("onBehalfOf", "address"),
            EventField::new("amount", "uint256"),
            EventField::indexed("referralCode", "uint16"),
        ],
    )
}

struct SupplyHandler;

#[async_trait]
impl EventHandler for SupplyHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let reserve = cx.decoded.address("reserve")?;
        let amount = TokenAmount::new(cx.decoded.uint("amount")?);

        let details = vec![
            EventDetail::address("Reserve", reserve),
            EventDetail::address("User", cx.decoded.address("user")?),
            EventDetail::address("On Behalf Of", cx.decoded.address("onBehalfOf")?),
            EventDetail::text("Referral Code", cx.decoded.uint("referralCode")?.to_string()),
        ];

        let pricing = cx
            .enrichment
            .fetch_price(cx.chain, reserve, cx.tx.price_date())
            .await;
        let token = match &pricing {
            Some(pricing) => EventToken::priced("Supply Amount", amount, pricing),
            None => EventToken::unpriced("Supply Amount", amount, None, None, None),
        };

        Ok(NormalizedEvent {
            action: DecodedAction::Deposited,
            category: EventCategory::Lending,
            name: "Supply".to_string(),
            protocol: protocol_meta(cx.log),
            details,
            tokens: vec![token],
        })
    }
}

fn withdraw_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "Withdraw",
        vec![
            EventField::indexed("reserve", "address"),
            EventField::indexed("user", "address"),
            EventField::indexed("to", "address"),
            EventField::new("amount", "uint256"),
        ],
    )
}

struct WithdrawHandler;

#[async_trait]
impl EventHandler for WithdrawHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let reserve = cx.decoded.address("reserve")?;
        let amount = TokenAmount::new(cx.decoded.uint("amount")?);

        let details = vec![
            EventDetail::address("Reserve", reserve),
            EventDetail::address("User", cx.decoded.address("user")?),
            EventDetail::address("To", cx.decoded.address("to")?),
        ];

        let pricing = cx
            .enrichment
            .fetch_price(cx.chain, reserve, cx.tx.price_date())
            .await;
        let token = match &pricing {
            Some(pricing) => EventToken::priced("Withdraw Amount", amount, pricing),
            None => EventToken::unpriced("Withdraw Amount", amount, None, None, None),
        };

        Ok(NormalizedEvent {
            action: DecodedAction::Withdrew,
            category: EventCategory::Lending,
            name: "Withdraw".to_string(),
            protocol: protocol_meta(cx.log),
            details,
            tokens: vec![token],
        })
    }
}
