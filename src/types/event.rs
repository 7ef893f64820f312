//! Normalized output record for decoded events.
//!
//! A [`NormalizedEvent`] is the canonical shape every handler produces:
//! a closed action/category classification, protocol metadata, an ordered
//! list of display details, and an ordered list of token movements.
//! Both lists appear exactly as the handler constructed them; the dispatch
//! engine never reorders or deduplicates entries.

use serde::{Deserialize, Serialize};

use super::tokens::{TokenAmount, TokenDecimals};
use crate::enrichment::AssetPricing;
use crate::normalize::prettify_usd;

/// Semantic action a decoded event represents.
///
/// This is a static property of each registered protocol event, assigned at
/// registration time rather than derived from the decoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecodedAction {
    Swapped,
    Transferred,
    Approved,
    Deposited,
    Withdrew,
    Minted,
    Burned,
    Claimed,
}

impl std::fmt::Display for DecodedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DecodedAction::Swapped => "Swapped",
            DecodedAction::Transferred => "Transferred",
            DecodedAction::Approved => "Approved",
            DecodedAction::Deposited => "Deposited",
            DecodedAction::Withdrew => "Withdrew",
            DecodedAction::Minted => "Minted",
            DecodedAction::Burned => "Burned",
            DecodedAction::Claimed => "Claimed",
        };
        write!(f, "{label}")
    }
}

/// Category of protocol activity a decoded event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Token,
    #[serde(rename = "DEX")]
    Dex,
    Lending,
    #[serde(rename = "NFT")]
    Nft,
    Staking,
    Bridge,
    Others,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EventCategory::Token => "Token",
            EventCategory::Dex => "DEX",
            EventCategory::Lending => "Lending",
            EventCategory::Nft => "NFT",
            EventCategory::Staking => "Staking",
            EventCategory::Bridge => "Bridge",
            EventCategory::Others => "Others",
        };
        write!(f, "{label}")
    }
}

/// How a detail value should be rendered by a UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Address,
    Text,
}

/// One display detail of a decoded event, e.g. the borrower's address or an
/// interest rate mode label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetail {
    pub title: String,
    pub value: String,
    pub render: RenderKind,
}

impl EventDetail {
    /// Detail rendered as an address
    pub fn address(title: impl Into<String>, value: impl std::fmt::Display) -> Self {
        Self {
            title: title.into(),
            value: value.to_string(),
            render: RenderKind::Address,
        }
    }

    /// Detail rendered as plain text
    pub fn text(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            render: RenderKind::Text,
        }
    }
}

/// One token movement of a decoded event.
///
/// `value` always carries the raw on-chain integer as a string;
/// `pretty_quote` carries the USD value of the movement when a price was
/// available, and is absent otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventToken {
    /// Label for this movement, e.g. "Borrow Amount"
    pub heading: String,
    /// Raw on-chain amount as a decimal string
    pub value: String,
    /// Token decimals, when known
    pub decimals: Option<TokenDecimals>,
    /// Ticker symbol, when known
    pub ticker_symbol: Option<String>,
    /// Ticker logo URL, when known
    pub ticker_logo: Option<String>,
    /// USD value of the movement, when a price was available
    pub pretty_quote: Option<String>,
}

impl EventToken {
    /// Build a token entry from a raw amount and a pricing lookup result.
    ///
    /// The quote is `display_amount × unit_price` formatted as USD; when the
    /// lookup returned no price the quote is absent and only the metadata
    /// fields are populated.
    ///
    /// # Examples
    ///
    /// ```
    /// use logsense::{AssetPricing, EventToken, TokenAmount, TokenDecimals, TokenPrice};
    ///
    /// let pricing = AssetPricing {
    ///     decimals: TokenDecimals::new(6),
    ///     ticker_symbol: Some("USDC".to_string()),
    ///     logo_url: None,
    ///     unit_price: Some(TokenPrice::new(1.0)),
    /// };
    /// let token = EventToken::priced("Borrow Amount", TokenAmount::from(1_000_000u64), &pricing);
    /// assert_eq!(token.value, "1000000");
    /// assert_eq!(token.pretty_quote.as_deref(), Some("$1.00"));
    /// ```
    pub fn priced(heading: impl Into<String>, amount: TokenAmount, pricing: &AssetPricing) -> Self {
        let pretty_quote = pricing
            .unit_price
            .map(|price| prettify_usd(price.value_of(amount.normalize(pricing.decimals))));
        Self {
            heading: heading.into(),
            value: amount.to_string(),
            decimals: Some(pricing.decimals),
            ticker_symbol: pricing.ticker_symbol.clone(),
            ticker_logo: pricing.logo_url.clone(),
            pretty_quote,
        }
    }

    /// Build a token entry with no pricing data, from whatever metadata the
    /// caller has (typically the log's sender contract fields).
    pub fn unpriced(
        heading: impl Into<String>,
        amount: TokenAmount,
        decimals: Option<TokenDecimals>,
        ticker_symbol: Option<String>,
        ticker_logo: Option<String>,
    ) -> Self {
        Self {
            heading: heading.into(),
            value: amount.to_string(),
            decimals,
            ticker_symbol,
            ticker_logo,
            pretty_quote: None,
        }
    }
}

/// Metadata of the protocol that emitted a decoded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMeta {
    /// Protocol logo URL, usually the log sender's logo
    pub logo: Option<String>,
    /// Human-readable protocol name, e.g. "Aave V3"
    pub name: String,
}

/// The canonical decoded-event record returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub action: DecodedAction,
    pub category: EventCategory,
    /// Human-readable event name, e.g. "Flash Loan"
    pub name: String,
    pub protocol: ProtocolMeta,
    /// Display details, in handler construction order
    pub details: Vec<EventDetail>,
    /// Token movements, in handler construction order
    pub tokens: Vec<EventToken>,
}
