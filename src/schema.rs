// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Event schemas and schema-driven log decoding.
//!
//! An [`EventSchema`] is a data value describing one event's binary layout:
//! its name plus an ordered list of typed field descriptors. Schemas are
//! validated once at construction (field types parsed, indexed-field limits
//! checked, signature hash computed) so that registration failures surface
//! at startup rather than at dispatch time.
//!
//! The actual byte decoding is delegated to `alloy-dyn-abi`'s
//! [`DynSolEvent`]; this module only assembles the event layout from the
//! schema and zips field names back onto the decoded values.
//!
//! # Example
//!
//! ```rust,ignore
//! use logsense::{EventField, EventSchema};
//!
//! let schema = EventSchema::new(
//!     "Transfer",
//!     vec![
//!         EventField::indexed("from", "address"),
//!         EventField::indexed("to", "address"),
//!         EventField::new("value", "uint256"),
//!     ],
//! )?;
//!
//! assert_eq!(schema.signature(), "Transfer(address,address,uint256)");
//! let args = schema.decode(&raw_log)?;
//! let value = args.uint("value")?;
//! ```

use alloy_dyn_abi::{DynSolEvent, DynSolType, DynSolValue};
use alloy_primitives::{keccak256, Address, B256, U256};

use crate::errors::{DecodeError, RegistryError};
use crate::types::log::RawLogEvent;

/// Non-anonymous events reserve topic0 for the signature, leaving room for
/// at most three indexed fields.
const MAX_INDEXED_FIELDS: usize = 3;

/// One typed field of an event schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventField {
    /// Field name, e.g. `reserve`
    pub name: String,
    /// Solidity type, e.g. `address` or `uint256`
    pub kind: String,
    /// Whether the field is stored in a topic rather than the data body
    pub indexed: bool,
}

impl EventField {
    /// A non-indexed field carried in the data body
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            indexed: false,
        }
    }

    /// An indexed field carried in a topic
    pub fn indexed(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            indexed: true,
        }
    }
}

/// Binary layout of one event: name plus ordered field descriptors.
///
/// Construction validates the layout and precomputes the canonical
/// signature hash and the decodable [`DynSolEvent`], so a constructed
/// schema can always decode.
#[derive(Debug, Clone)]
pub struct EventSchema {
    name: String,
    fields: Vec<EventField>,
    signature: String,
    signature_hash: B256,
    event: DynSolEvent,
}

impl EventSchema {
    /// Build a schema from an event name and ordered fields.
    ///
    /// Fails with [`RegistryError::InvalidSchema`] when a field type does
    /// not parse as a Solidity type or more than three fields are indexed.
    pub fn new(
        name: impl Into<String>,
        fields: Vec<EventField>,
    ) -> Result<Self, RegistryError> {
        let name = name.into();

        let mut indexed_types = Vec::new();
        let mut body_types = Vec::new();
        let mut canonical = Vec::with_capacity(fields.len());
        for field in &fields {
            let kind: DynSolType = field.kind.parse().map_err(|e| {
                RegistryError::invalid_schema(
                    &name,
                    format!("field `{}` has unparseable type `{}`: {e}", field.name, field.kind),
                )
            })?;
            canonical.push(kind.to_string());
            if field.indexed {
                indexed_types.push(kind);
            } else {
                body_types.push(kind);
            }
        }

        if indexed_types.len() > MAX_INDEXED_FIELDS {
            return Err(RegistryError::invalid_schema(
                &name,
                format!(
                    "{} indexed fields, but events allow at most {MAX_INDEXED_FIELDS}",
                    indexed_types.len()
                ),
            ));
        }

        let signature = format!("{name}({})", canonical.join(","));
        let signature_hash = keccak256(signature.as_bytes());

        let event = DynSolEvent::new(
            Some(signature_hash),
            indexed_types,
            DynSolType::Tuple(body_types),
        )
        .ok_or_else(|| {
            RegistryError::invalid_schema(&name, "field layout is not decodable")
        })?;

        Ok(Self {
            name,
            fields,
            signature,
            signature_hash,
            event,
        })
    }

    /// Event name, e.g. `Borrow`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered field descriptors
    pub fn fields(&self) -> &[EventField] {
        &self.fields
    }

    /// Canonical signature, e.g. `Transfer(address,address,uint256)`
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Keccak-256 hash of the canonical signature; matched against topic0
    pub fn signature_hash(&self) -> B256 {
        self.signature_hash
    }

    /// Apply this schema to a raw log's topics and data.
    ///
    /// Decoding is deterministic: the same log decodes to the same
    /// [`DecodedArgs`] every time. A structural mismatch (wrong topic
    /// count, malformed body bytes, signature mismatch) yields a
    /// [`DecodeError`].
    pub fn decode(&self, log: &RawLogEvent) -> Result<DecodedArgs, DecodeError> {
        if log.topics.is_empty() {
            return Err(DecodeError::MissingTopics);
        }

        let decoded = self
            .event
            .decode_log_parts(log.topics.iter().copied(), &log.data)?;

        // Zip field names back onto the decoded values; indexed and body
        // values each come back in declaration order.
        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = if field.indexed {
                indexed.next()
            } else {
                body.next()
            };
            match value {
                Some(value) => values.push((field.name.clone(), value)),
                None => return Err(DecodeError::missing_field(&field.name)),
            }
        }

        Ok(DecodedArgs { values })
    }
}

/// Typed event arguments produced by applying an [`EventSchema`] to one raw
/// log.
///
/// Arguments are scoped to a single dispatch call and never cached across
/// logs. Handlers read them through the typed accessors, which produce
/// [`DecodeError`]s a failed lookup can be traced by.
#[derive(Debug, Clone)]
pub struct DecodedArgs {
    values: Vec<(String, DynSolValue)>,
}

impl DecodedArgs {
    /// Raw decoded value for `name`, if present
    pub fn get(&self, name: &str) -> Option<&DynSolValue> {
        self.values
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Address-typed field
    pub fn address(&self, name: &str) -> Result<Address, DecodeError> {
        self.require(name)?
            .as_address()
            .ok_or_else(|| DecodeError::type_mismatch(name, "an address"))
    }

    /// Unsigned-integer field of any width, widened to U256
    pub fn uint(&self, name: &str) -> Result<U256, DecodeError> {
        self.require(name)?
            .as_uint()
            .map(|(value, _bits)| value)
            .ok_or_else(|| DecodeError::type_mismatch(name, "an unsigned integer"))
    }

    /// Boolean field
    pub fn boolean(&self, name: &str) -> Result<bool, DecodeError> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| DecodeError::type_mismatch(name, "a bool"))
    }

    /// Iterate over `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DynSolValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of decoded fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the event has no fields
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> Result<&DynSolValue, DecodeError> {
        self.get(name)
            .ok_or_else(|| DecodeError::missing_field(name))
    }
}
