//! Domain separator and signing-digest assembly.
//!
//! The final digest is `keccak256(0x19 0x01 ‖ domainSeparator ‖
//! hashStruct(message))`. The domain separator is a plain struct hash of
//! the `EIP712Domain` type synthesized from the populated domain fields,
//! so the same schema hashes differently under domains that populate
//! different subsets.

use crate::encode;
use crate::error::TypedDataError;
use crate::typestring;
use crate::types::TypedData;
use alloy_primitives::{keccak256, B256};
use serde_json::{Map, Value};

/// EIP-191 version byte pair binding a structured-data digest.
const EIP191_HEADER: [u8; 2] = [0x19, 0x01];

/// The intermediate and final hashes produced for one signing request.
/// The intermediates are useful for display and debugging by outer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningHashes {
	pub domain_separator: B256,
	pub message_hash: B256,
	pub digest: B256,
}

/// Combines a domain separator and a message hash into the signing digest.
pub fn signing_digest(domain_separator: B256, message_hash: B256) -> B256 {
	let mut buf = Vec::with_capacity(2 + 32 + 32);
	buf.extend_from_slice(&EIP191_HEADER);
	buf.extend_from_slice(domain_separator.as_slice());
	buf.extend_from_slice(message_hash.as_slice());
	keccak256(buf)
}

impl TypedData {
	/// The canonical type string for `name` under this schema.
	pub fn encode_type(&self, name: &str) -> Result<String, TypedDataError> {
		let types = self.resolved_types()?;
		typestring::encode_type(name, &types)
	}

	/// The keccak-256 type hash for `name` under this schema.
	pub fn type_hash(&self, name: &str) -> Result<B256, TypedDataError> {
		let types = self.resolved_types()?;
		typestring::type_hash(name, &types)
	}

	/// Hashes an arbitrary struct instance of type `name` under this schema.
	pub fn hash_struct(
		&self,
		name: &str,
		value: &Map<String, Value>,
	) -> Result<B256, TypedDataError> {
		let types = self.resolved_types()?;
		encode::hash_struct(name, Some(value), &types, 0)
	}

	/// The domain separator: the struct hash of the populated domain fields
	/// under the synthesized `EIP712Domain` type.
	pub fn domain_separator(&self) -> Result<B256, TypedDataError> {
		let types = self.resolved_types()?;
		encode::hash_struct("EIP712Domain", Some(&self.domain.to_message()), &types, 0)
	}

	/// The struct hash of `message` under `primary_type`.
	pub fn message_hash(&self) -> Result<B256, TypedDataError> {
		let types = self.resolved_types()?;
		encode::hash_struct(&self.primary_type, Some(&self.message), &types, 0)
	}

	/// Validates the schema and computes the domain separator, message
	/// hash, and final signing digest in one pass over the resolved schema.
	pub fn signing_hashes(&self) -> Result<SigningHashes, TypedDataError> {
		let types = self.resolved_types()?;
		let domain_separator =
			encode::hash_struct("EIP712Domain", Some(&self.domain.to_message()), &types, 0)?;
		let message_hash = encode::hash_struct(&self.primary_type, Some(&self.message), &types, 0)?;
		let digest = signing_digest(domain_separator, message_hash);
		tracing::debug!(
			%domain_separator,
			%message_hash,
			%digest,
			primary_type = %self.primary_type,
			"assembled signing digest"
		);
		Ok(SigningHashes {
			domain_separator,
			message_hash,
			digest,
		})
	}

	/// The final signing digest for this typed data.
	pub fn signing_digest(&self) -> Result<B256, TypedDataError> {
		Ok(self.signing_hashes()?.digest)
	}
}
