//! Error types for pricing source lookups.

/// Errors a [`PricingSource`](crate::PricingSource) implementation can
/// return for a single asset lookup.
///
/// The enrichment orchestrator maps every per-asset failure to an absent
/// entry in its result mapping; these errors never propagate out of a
/// dispatch call.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    /// The pricing request failed, e.g. a transport or serialization error
    /// in the underlying client.
    #[error("pricing request failed: {details}")]
    RequestFailed {
        /// Details about the failure
        details: String,
    },

    /// The pricing backend is temporarily unavailable.
    #[error("pricing backend unavailable: {details}")]
    Unavailable {
        /// Details about the outage
        details: String,
    },
}

impl PricingError {
    /// Create a `RequestFailed` error with details.
    pub fn request_failed(details: impl Into<String>) -> Self {
        PricingError::RequestFailed {
            details: details.into(),
        }
    }

    /// Create an `Unavailable` error with details.
    pub fn unavailable(details: impl Into<String>) -> Self {
        PricingError::Unavailable {
            details: details.into(),
        }
    }
}
