//! Error types for schema-driven log decoding.

/// Errors that can occur when applying an event schema to raw log bytes.
///
/// A decode error is always scoped to a single log; the dispatch engine
/// reports it per log and continues with the transaction's sibling logs.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The log has no topics, so there is no signature to match or decode.
    #[error("log has no topics")]
    MissingTopics,

    /// The ABI decoding primitive rejected the topics/data, e.g. wrong topic
    /// count for the schema or malformed body bytes.
    #[error("abi decoding failed: {0}")]
    Abi(#[from] alloy_dyn_abi::Error),

    /// A handler asked for a field the decoded arguments do not contain.
    #[error("decoded arguments have no field `{name}`")]
    MissingField {
        /// Name of the missing field
        name: String,
    },

    /// A handler asked for a field under the wrong type.
    #[error("field `{name}` is not {expected}")]
    TypeMismatch {
        /// Name of the field
        name: String,
        /// The type the handler expected
        expected: &'static str,
    },
}

impl DecodeError {
    /// Create a `MissingField` error for a specific field.
    pub fn missing_field(name: impl Into<String>) -> Self {
        DecodeError::MissingField { name: name.into() }
    }

    /// Create a `TypeMismatch` error for a specific field.
    pub fn type_mismatch(name: impl Into<String>, expected: &'static str) -> Self {
        DecodeError::TypeMismatch {
            name: name.into(),
            expected,
        }
    }
}
