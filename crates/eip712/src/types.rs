//! Core data model: type map, domain descriptor, and the typed-data
//! aggregate.
//!
//! These types mirror the JSON wire shape used by `eth_signTypedData`
//! requests, so an external RPC or CLI layer can deserialize a request body
//! straight into [`TypedData`]. Message values stay as `serde_json::Value`
//! trees; all structure is checked against the type map at encode time.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Mapping from struct type name to its ordered field declarations.
///
/// Field order is significant: it fixes both the canonical type string and
/// the word order of the encoded struct.
pub type Types = HashMap<String, Vec<TypeField>>;

/// A single field declaration inside a struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
	pub name: String,
	/// The verbatim type reference, elementary or struct, with any array
	/// suffixes (`Foo[2][]`) attached.
	#[serde(rename = "type")]
	pub type_ref: String,
}

/// The EIP-712 domain descriptor.
///
/// Every field is optional. Only populated fields participate in the
/// domain's derived `EIP712Domain` type and struct hash, so two domains
/// with different populated subsets hash under different type strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eip712Domain {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<String>,
	#[serde(
		default,
		skip_serializing_if = "Option::is_none",
		deserialize_with = "deserialize_chain_id"
	)]
	pub chain_id: Option<U256>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub verifying_contract: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub salt: Option<String>,
}

impl Eip712Domain {
	/// True when no domain field is populated.
	pub fn is_empty(&self) -> bool {
		self.name.is_none()
			&& self.version.is_none()
			&& self.chain_id.is_none()
			&& self.verifying_contract.is_none()
			&& self.salt.is_none()
	}

	/// Field declarations for the populated subset, in the canonical
	/// EIP-712 order. This is the synthesized `EIP712Domain` type entry.
	pub fn type_fields(&self) -> Vec<TypeField> {
		let mut fields = Vec::with_capacity(5);
		let mut push = |name: &str, type_ref: &str| {
			fields.push(TypeField {
				name: name.to_string(),
				type_ref: type_ref.to_string(),
			});
		};
		if self.name.is_some() {
			push("name", "string");
		}
		if self.version.is_some() {
			push("version", "string");
		}
		if self.chain_id.is_some() {
			push("chainId", "uint256");
		}
		if self.verifying_contract.is_some() {
			push("verifyingContract", "address");
		}
		if self.salt.is_some() {
			push("salt", "bytes32");
		}
		fields
	}

	/// The domain as a message map suitable for struct hashing under the
	/// synthesized `EIP712Domain` type.
	pub fn to_message(&self) -> Map<String, Value> {
		let mut message = Map::new();
		if let Some(name) = &self.name {
			message.insert("name".to_string(), Value::String(name.clone()));
		}
		if let Some(version) = &self.version {
			message.insert("version".to_string(), Value::String(version.clone()));
		}
		if let Some(chain_id) = &self.chain_id {
			message.insert("chainId".to_string(), Value::String(chain_id.to_string()));
		}
		if let Some(contract) = &self.verifying_contract {
			message.insert(
				"verifyingContract".to_string(),
				Value::String(contract.clone()),
			);
		}
		if let Some(salt) = &self.salt {
			message.insert("salt".to_string(), Value::String(salt.clone()));
		}
		message
	}
}

/// The aggregate signing request: schema, primary type, domain, and the
/// untyped message tree.
///
/// The core holds no state across calls; every hashing entry point takes
/// `&self` and allocates only transient working memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
	pub types: Types,
	pub primary_type: String,
	#[serde(default)]
	pub domain: Eip712Domain,
	#[serde(default)]
	pub message: Map<String, Value>,
}

/// Accepts a JSON number, a decimal string, or a `0x`-prefixed hex string.
fn deserialize_chain_id<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	match value {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Number(n)) => n
			.as_u64()
			.map(|u| Some(U256::from(u)))
			.ok_or_else(|| serde::de::Error::custom("chainId must be a non-negative integer")),
		Some(Value::String(s)) => {
			let parsed = match s.strip_prefix("0x") {
				Some(digits) => U256::from_str_radix(digits, 16),
				None => U256::from_str_radix(&s, 10),
			};
			parsed.map(Some).map_err(serde::de::Error::custom)
		},
		Some(other) => Err(serde::de::Error::custom(format!(
			"chainId must be a number or string, got {}",
			other
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_deserialize_wire_shape() {
		let typed: TypedData = serde_json::from_value(json!({
			"types": {
				"EIP712Domain": [
					{"name": "name", "type": "string"},
					{"name": "chainId", "type": "uint256"}
				],
				"Person": [
					{"name": "name", "type": "string"},
					{"name": "wallet", "type": "address"}
				]
			},
			"primaryType": "Person",
			"domain": {"name": "Test", "chainId": 1},
			"message": {"name": "alice", "wallet": "0x0000000000000000000000000000000000000001"}
		}))
		.unwrap();

		assert_eq!(typed.primary_type, "Person");
		assert_eq!(typed.domain.name.as_deref(), Some("Test"));
		assert_eq!(typed.domain.chain_id, Some(U256::from(1)));
		assert_eq!(typed.types["Person"][1].type_ref, "address");
		assert_eq!(typed.message["name"], json!("alice"));
	}

	#[test]
	fn test_chain_id_string_forms() {
		let decimal: Eip712Domain = serde_json::from_value(json!({"chainId": "31337"})).unwrap();
		assert_eq!(decimal.chain_id, Some(U256::from(31337)));

		let hex: Eip712Domain = serde_json::from_value(json!({"chainId": "0x7a69"})).unwrap();
		assert_eq!(hex.chain_id, Some(U256::from(31337)));

		let bad = serde_json::from_value::<Eip712Domain>(json!({"chainId": true}));
		assert!(bad.is_err());
	}

	#[test]
	fn test_domain_type_fields_follow_populated_subset() {
		let domain = Eip712Domain {
			name: Some("Ether Mail".to_string()),
			chain_id: Some(U256::from(1)),
			..Default::default()
		};
		let fields: Vec<(String, String)> = domain
			.type_fields()
			.into_iter()
			.map(|f| (f.name, f.type_ref))
			.collect();
		assert_eq!(
			fields,
			vec![
				("name".to_string(), "string".to_string()),
				("chainId".to_string(), "uint256".to_string()),
			]
		);

		let message = domain.to_message();
		assert_eq!(message["name"], json!("Ether Mail"));
		assert_eq!(message["chainId"], json!("1"));
		assert!(!domain.is_empty());
		assert!(Eip712Domain::default().is_empty());
	}
}
