//! Uniswap V2 pair swap decoder.
//!
//! The Swap event reports in/out amounts for both pool tokens; exactly one
//! side of each pair is nonzero for a normal swap. The pair contract does
//! not identify its tokens in the event, so the token entries carry the
//! summed amounts without per-token metadata.

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{HandlerError, RegistryError};
use crate::handler::{EventHandler, HandlerContext};
use crate::registry::{DecoderKey, DecoderRegistry, ProtocolInfo};
use crate::schema::{EventField, EventSchema};
use crate::types::chain::ChainScope;
use crate::types::event::{
    DecodedAction, EventCategory, EventDetail, EventToken, NormalizedEvent, ProtocolMeta,
};
use crate::types::tokens::TokenAmount;

const PROTOCOL: &str = "uniswap-v2";
const PROTOCOL_NAME: &str = "Uniswap V2";

const DEPLOYED_CHAINS: [&str; 3] = ["eth-mainnet", "matic-mainnet", "base-mainnet"];

/// Register the Uniswap V2 decoder.
pub fn register(registry: &mut DecoderRegistry) -> Result<(), RegistryError> {
    registry.register_protocol(ProtocolInfo::new(
        PROTOCOL,
        ["Uniswap V2", "Uniswap V2: Pair"],
    ));

    registry.register(
        DecoderKey::new(PROTOCOL, "Swap"),
        ChainScope::new(DEPLOYED_CHAINS)?,
        swap_schema()?,
        Arc::new(SwapHandler),
    )
}

fn swap_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "Swap",
        vec![
            EventField::indexed("sender", "address"),
            EventField::new("amount0In", "uint256"),
            EventField::new("amount1In", "uint256"),
            EventField::new("amount0Out", "uint256"),
            EventField::new("amount1Out", "uint256"),
            EventField::indexed("to", "address"),
        ],
    )
}

struct SwapHandler;

#[async_trait]
impl EventHandler for SwapHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let amount_in = cx
            .decoded
            .uint("amount0In")?
            .saturating_add(cx.decoded.uint("amount1In")?);
        let amount_out = cx
            .decoded
            .uint("amount0Out")?
            .saturating_add(cx.decoded.uint("amount1Out")?);

        let details = vec![
            EventDetail::address("Sender", cx.decoded.address("sender")?),
            EventDetail::address("To", cx.decoded.address("to")?),
        ];
        let tokens = vec![
            EventToken::unpriced("Amount In", TokenAmount::new(amount_in), None, None, None),
            EventToken::unpriced("Amount Out", TokenAmount::new(amount_out), None, None, None),
        ];

        Ok(NormalizedEvent {
            action: DecodedAction::Swapped,
            category: EventCategory::Dex,
            name: "Swap".to_string(),
            protocol: ProtocolMeta {
                logo: cx.log.sender_logo_url.clone(),
                name: PROTOCOL_NAME.to_string(),
            },
            details,
            tokens,
        })
    }
}
