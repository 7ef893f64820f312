//! Error types for the logsense library.
//!
//! Follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`RegistryError`],
//!   [`DispatchError`], [`DecodeError`], [`PricingError`])
//! - **Unified error type** ([`LogsenseError`]) for convenience when you
//!   don't need to distinguish between error sources
//!
//! Two of these deserve special attention:
//!
//! - [`RegistryError::Conflict`] is a startup-time packaging bug (two
//!   registrations overlap in key and chain scope) and must be fixed before
//!   the registry serves traffic.
//! - [`DispatchError::Unrecognized`] is the expected majority outcome for
//!   logs of contracts the system does not decode, and should be skipped
//!   silently rather than reported.

mod decode;
mod dispatch;
mod pricing;
mod registry;

pub use decode::DecodeError;
pub use dispatch::{DispatchError, HandlerError};
pub use pricing::PricingError;
pub use registry::RegistryError;

/// Unified error type for all logsense operations.
///
/// All module-specific error types convert to `LogsenseError` via `From`
/// implementations, so `?` propagates them naturally.
#[derive(Debug, thiserror::Error)]
pub enum LogsenseError {
    /// Error from decoder registration.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Error from dispatching a raw log.
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Error from applying a schema to raw log bytes.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error from a pricing source lookup.
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),
}
