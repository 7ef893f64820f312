//! Grindery One transfer decoder.
//!
//! Grindery's token only lives on Polygon, and its transfers are surfaced
//! as DEX activity. The handler never asks the pricing source for data:
//! the token entry is built entirely from the sender contract metadata and
//! carries no quote.

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
use crate::types::tokens::{TokenAmount, TokenDecimals};

const PROTOCOL: &str = "grindery-one";

/// Register the Grindery One decoder.
pub fn register(registry: &mut DecoderRegistry) -> Result<(), RegistryError> {
    registry.register_protocol(ProtocolInfo::new(PROTOCOL, ["Grindery One", "Grindery"]));

    registry.register(
        DecoderKey::new(PROTOCOL, "Transfer"),
        ChainScope::single("matic-mainnet"),
        transfer_schema()?,
        Arc::new(TransferHandler),
    )
}

fn transfer_schema() -> Result<EventSchema, RegistryError> {
    EventSchema::new(
        "Transfer",
        vec![
            EventField::indexed("from", "address"),
            EventField::indexed("to", "address"),
            EventField::new("value", "uint256"),
        ],
    )
}

struct TransferHandler;

#[async_trait]
impl EventHandler for TransferHandler {
    async fn handle(&self, cx: HandlerContext<'_>) -> Result<NormalizedEvent, HandlerError> {
        let from = cx.decoded.address("from")?;
        let to = cx.decoded.address("to")?;
        let value = TokenAmount::new(cx.decoded.uint("value")?);

        Ok(NormalizedEvent {
            action: DecodedAction::Swapped,
            category: EventCategory::Dex,
            name: "Transfer".to_string(),
            protocol: ProtocolMeta {
                logo: cx.log.sender_logo_url.clone(),
                name: cx
                    .log
                    .sender_name
                    .clone()
                    .unwrap_or_else(|| "Grindery One".to_string()),
            },
            details: vec![
                EventDetail::address("From", from),
                EventDetail::address("To", to),
            ],
            tokens: vec![EventToken::unpriced(
                "Token Amount",
                value,
                cx.log.sender_contract_decimals.map(TokenDecimals::new),
                cx.log.sender_contract_ticker_symbol.clone(),
                cx.log.sender_logo_url.clone(),
            )],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chain::ChainName;

    #[test]
    fn test_registered_for_polygon_only() {
        let mut registry = DecoderRegistry::new();
        register(&mut registry).unwrap();

        let proto = crate::types::chain::ProtocolId::from(PROTOCOL);
        assert!(registry
            .lookup(&proto, "Transfer", &ChainName::from("matic-mainnet"))
            .is_some());
        assert!(registry
            .lookup(&proto, "Transfer", &ChainName::from("eth-mainnet"))
            .is_none());
    }
}
