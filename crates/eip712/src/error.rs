//! Error taxonomy for typed-data validation and encoding.
//!
//! Every variant is a permanent rejection of a malformed schema or message.
//! A partially-computed hash is cryptographically meaningless, so the first
//! failure aborts the whole encode; there is no recovery or partial-result
//! mode, and retrying the same input can never succeed.

use thiserror::Error;

/// Errors produced while validating a type schema or hashing a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypedDataError {
	/// A field references a type that is neither elementary nor declared.
	#[error("reference to undeclared type {0}")]
	UnknownType(String),
	/// A type reference has broken array-suffix syntax or an invalid
	/// fixed-array size token.
	#[error("malformed type reference {0:?}")]
	MalformedTypeRef(String),
	/// A `0x`-prefixed value has an odd nibble count or non-hex characters.
	#[error("invalid hex encoding {0:?}")]
	InvalidHexEncoding(String),
	/// A fixed-size byte type (`bytesN`, `address`) received a value of the
	/// wrong length.
	#[error("{type_name} expects {expected} bytes, got {actual}")]
	InvalidFixedLength {
		type_name: String,
		expected: usize,
		actual: usize,
	},
	/// A numeric value lies outside the range of its declared bit width and
	/// signedness.
	#[error("value {value} out of range for {type_name}")]
	IntegerOverflow { type_name: String, value: String },
	/// A fixed-size array field received a sequence of the wrong length.
	#[error("array {type_name} expects {expected} elements, got {actual}")]
	ArrayLengthMismatch {
		type_name: String,
		expected: usize,
		actual: usize,
	},
	/// A value's dynamic shape does not match the schema at that position.
	/// `depth` is the nesting level of the failing field, counted from the
	/// top-level struct.
	#[error("expected {expected} at depth {depth}, got {actual}")]
	TypeMismatch {
		expected: String,
		actual: String,
		depth: usize,
	},
}
