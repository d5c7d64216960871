//! EIP-712 typed structured data hashing.
//!
//! This crate computes the canonical, cryptographically-bound digest of a
//! typed message prior to signing, per the EIP-712 scheme: it validates a
//! user-defined type schema, derives canonical type strings and type
//! hashes, encodes arbitrarily-nested message values (primitives, structs,
//! fixed- and dynamic-length arrays at any depth, including the
//! multi-dimensional trees used by bulk batched-object signing) into
//! 32-byte ABI words, and folds the result into a domain separator and the
//! final `0x19 0x01` signing digest.
//!
//! All operations are pure functions over an immutable [`TypedData`] value;
//! the crate holds no state, performs no I/O, and does not sign anything.
//! Signing, key management, and transport belong to the caller. When the
//! schema and message originate from untrusted sources, the caller should
//! bound nesting depth and element counts before hashing.

/// Coercions from loosely-typed JSON values into canonical primitives.
pub mod coerce;
/// Domain separator and signing-digest assembly.
pub mod digest;
/// Recursive struct, array, and primitive value encoding.
pub mod encode;
/// Error taxonomy for validation and encoding.
pub mod error;
/// Parsed representation of type references.
pub mod field_type;
/// Core data types: type map, domain, and the typed-data aggregate.
pub mod types;
/// Canonical type strings and type hashes.
pub mod typestring;
/// Schema validation and resolved-schema construction.
pub mod validate;

pub use coerce::{convert_data_to_slice, parse_bytes, parse_integer, Integer};
pub use digest::{signing_digest, SigningHashes};
pub use encode::{encode_data, encode_primitive_value, hash_struct};
pub use error::TypedDataError;
pub use field_type::{ElementaryType, FieldType};
pub use types::{Eip712Domain, TypeField, TypedData, Types};
pub use typestring::{encode_type, type_hash};
pub use validate::{ResolvedField, ResolvedTypes};
