//! Recursive struct, array, and primitive value encoding.
//!
//! `encode_data` packs a struct instance into 32-byte words: the type hash
//! first, then one word per field in declaration order. Nested structs and
//! arrays contribute the keccak-256 of their own encoding, so the result of
//! `hash_struct` is `keccak256(typeHash ‖ encodeData(value))` at every
//! level. Dispatch is uniform at every nesting depth; only the declared
//! type drives it.
//!
//! A field absent from the message encodes as the zero value of its
//! declared type rather than failing. This is a deliberate compatibility
//! allowance: a field typo degrades to zero, and rejecting it instead would
//! change digests for already-signed messages.

use crate::coerce;
use crate::error::TypedDataError;
use crate::field_type::{ElementaryType, FieldType};
use crate::typestring;
use crate::validate::ResolvedTypes;
use alloy_primitives::{keccak256, B256};
use serde_json::{Map, Value};

/// Hashes a struct instance: `keccak256(typeHash(name) ‖ encodeData(...))`.
/// `None` hashes the all-zero instance of the type.
pub fn hash_struct(
	name: &str,
	value: Option<&Map<String, Value>>,
	types: &ResolvedTypes,
	depth: usize,
) -> Result<B256, TypedDataError> {
	Ok(keccak256(encode_data(name, value, types, depth)?))
}

/// The 32-byte-word-packed encoding of a struct instance, type hash
/// included.
pub fn encode_data(
	name: &str,
	value: Option<&Map<String, Value>>,
	types: &ResolvedTypes,
	depth: usize,
) -> Result<Vec<u8>, TypedDataError> {
	let fields = types
		.get(name)
		.ok_or_else(|| TypedDataError::UnknownType(name.to_string()))?;
	let mut buf = Vec::with_capacity(32 * (fields.len() + 1));
	buf.extend_from_slice(typestring::type_hash(name, types)?.as_slice());
	for field in fields {
		let field_value = value.and_then(|map| map.get(&field.name));
		let word = encode_field(&field.parsed, field_value, types, depth + 1)?;
		buf.extend_from_slice(&word);
	}
	Ok(buf)
}

/// One field's 32-byte word, dispatched on its parsed type.
fn encode_field(
	field_type: &FieldType,
	value: Option<&Value>,
	types: &ResolvedTypes,
	depth: usize,
) -> Result<[u8; 32], TypedDataError> {
	match field_type {
		FieldType::Elementary(elem) => encode_primitive_value(elem, value, depth),
		FieldType::Struct(name) => {
			let object = match value {
				None => None,
				Some(Value::Object(map)) => Some(map),
				Some(other) => {
					return Err(TypedDataError::TypeMismatch {
						expected: name.clone(),
						actual: coerce::describe(other),
						depth,
					})
				},
			};
			hash_struct(name, object, types, depth).map(|hash| hash.0)
		},
		FieldType::Array { elem, len } => encode_array(elem, *len, value, types, depth),
	}
}

/// An array's word: keccak-256 over the concatenated per-element words.
/// The zero value of `T[n]` is n zero-`T`s; of `T[]`, the empty array.
fn encode_array(
	elem: &FieldType,
	len: Option<usize>,
	value: Option<&Value>,
	types: &ResolvedTypes,
	depth: usize,
) -> Result<[u8; 32], TypedDataError> {
	let mut buf;
	match value {
		None => {
			let count = len.unwrap_or(0);
			buf = Vec::with_capacity(32 * count);
			for _ in 0..count {
				buf.extend_from_slice(&encode_field(elem, None, types, depth + 1)?);
			}
		},
		Some(value) => {
			let elements = coerce::convert_data_to_slice(value, depth)?;
			if let Some(expected) = len {
				if elements.len() != expected {
					return Err(TypedDataError::ArrayLengthMismatch {
						type_name: format!("{}[{}]", elem, expected),
						expected,
						actual: elements.len(),
					});
				}
			}
			buf = Vec::with_capacity(32 * elements.len());
			for element in elements {
				buf.extend_from_slice(&encode_field(elem, Some(element), types, depth + 1)?);
			}
		},
	}
	Ok(keccak256(buf).0)
}

/// Encodes one elementary value into its 32-byte word. Dynamic types
/// (`bytes`, `string`) contribute the keccak-256 of their raw content.
/// `depth` only annotates diagnostics; it never affects encoding.
pub fn encode_primitive_value(
	elem: &ElementaryType,
	value: Option<&Value>,
	depth: usize,
) -> Result<[u8; 32], TypedDataError> {
	let Some(value) = value else {
		return Ok(zero_word(elem));
	};
	let mut word = [0u8; 32];
	match elem {
		ElementaryType::Address => {
			let bytes = coerce::require_bytes(value, depth)?;
			if bytes.len() != 20 {
				return Err(TypedDataError::InvalidFixedLength {
					type_name: "address".to_string(),
					expected: 20,
					actual: bytes.len(),
				});
			}
			word[12..].copy_from_slice(&bytes);
		},
		ElementaryType::Bool => {
			let flag = value.as_bool().ok_or_else(|| mismatch(elem, value, depth))?;
			word[31] = flag as u8;
		},
		ElementaryType::String => {
			let text = value.as_str().ok_or_else(|| mismatch(elem, value, depth))?;
			word = keccak256(text.as_bytes()).0;
		},
		ElementaryType::Bytes => {
			word = keccak256(coerce::require_bytes(value, depth)?).0;
		},
		ElementaryType::FixedBytes(n) => {
			let bytes = coerce::require_bytes(value, depth)?;
			if bytes.len() != *n {
				return Err(TypedDataError::InvalidFixedLength {
					type_name: elem.to_string(),
					expected: *n,
					actual: bytes.len(),
				});
			}
			word[..bytes.len()].copy_from_slice(&bytes);
		},
		ElementaryType::Int(_) | ElementaryType::Uint(_) => {
			let int = coerce::parse_integer(elem, value).map_err(|err| match err {
				TypedDataError::TypeMismatch { expected, actual, .. } => {
					TypedDataError::TypeMismatch { expected, actual, depth }
				},
				other => other,
			})?;
			word = int.to_word();
		},
	}
	Ok(word)
}

/// The zero value word: all zero bytes, except dynamic types whose zero
/// value is the hash of the empty content.
fn zero_word(elem: &ElementaryType) -> [u8; 32] {
	match elem {
		ElementaryType::Bytes | ElementaryType::String => keccak256([0u8; 0]).0,
		_ => [0u8; 32],
	}
}

fn mismatch(elem: &ElementaryType, value: &Value, depth: usize) -> TypedDataError {
	TypedDataError::TypeMismatch {
		expected: elem.to_string(),
		actual: coerce::describe(value),
		depth,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::{hex, U256};
	use serde_json::json;

	fn primitive(type_name: &str, value: &Value) -> Result<[u8; 32], TypedDataError> {
		let elem = ElementaryType::parse(type_name).unwrap();
		encode_primitive_value(&elem, Some(value), 1)
	}

	#[test]
	fn test_bytes_padding() {
		// (type, input, expected word hex or None for error)
		let cases: Vec<(&str, Value, Option<&str>)> = vec![
			("bytes20", json!([]), None),
			(
				"bytes1",
				json!([1]),
				Some("0100000000000000000000000000000000000000000000000000000000000000"),
			),
			("bytes1", json!([1, 2]), None),
			(
				"bytes7",
				json!([1, 2, 3, 4, 5, 6, 7]),
				Some("0102030405060700000000000000000000000000000000000000000000000000"),
			),
			(
				"bytes32",
				json!("0x0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20"),
				Some("0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20"),
			),
			(
				"bytes32",
				json!("0x0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f2021"),
				None,
			),
		];
		for (type_name, input, expected) in cases {
			let result = primitive(type_name, &input);
			match expected {
				Some(word_hex) => {
					assert_eq!(
						result.unwrap().to_vec(),
						hex::decode(word_hex).unwrap(),
						"{} {}",
						type_name,
						input
					);
				},
				None => assert!(result.is_err(), "expected {} {} to fail", type_name, input),
			}
		}
	}

	#[test]
	fn test_address_variants() {
		let expected =
			hex::decode("0000000000000000000000000102030405060708090a0b0c0d0e0f1011121314")
				.unwrap();

		let as_hex = json!("0x0102030405060708090A0B0C0D0E0F1011121314");
		assert_eq!(primitive("address", &as_hex).unwrap().to_vec(), expected);

		let as_bytes = json!([
			0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
			0x0f, 0x10, 0x11, 0x12, 0x13, 0x14
		]);
		assert_eq!(primitive("address", &as_bytes).unwrap().to_vec(), expected);

		// Too long, too short, or not byte-like.
		for bad in [
			json!("0x000102030405060708090A0B0C0D0E0F1011121314"),
			json!("0x01"),
			json!(""),
			json!([0, 0, 0]),
			json!(null),
		] {
			assert!(primitive("address", &bad).is_err(), "expected {} to fail", bad);
		}
	}

	#[test]
	fn test_bool_encoding() {
		let mut expected = [0u8; 32];
		assert_eq!(primitive("bool", &json!(false)).unwrap(), expected);
		expected[31] = 1;
		assert_eq!(primitive("bool", &json!(true)).unwrap(), expected);
		assert!(primitive("bool", &json!("true")).is_err());
	}

	#[test]
	fn test_dynamic_types_hash_content() {
		assert_eq!(
			primitive("string", &json!("Hello, Bob!")).unwrap(),
			keccak256("Hello, Bob!".as_bytes()).0
		);
		assert_eq!(
			primitive("bytes", &json!("0x1234")).unwrap(),
			keccak256([0x12u8, 0x34]).0
		);
	}

	#[test]
	fn test_signed_integer_sign_extension() {
		assert_eq!(primitive("int256", &json!(-1)).unwrap(), [0xff; 32]);

		let mut expected = [0xff; 32];
		expected[31] = 0x80;
		assert_eq!(primitive("int8", &json!(-128)).unwrap(), expected);
	}

	/// Reinterprets a word under the given signedness, returning the
	/// sign/magnitude pair it encodes.
	fn decode_word(word: [u8; 32], signed: bool) -> coerce::Integer {
		let raw = U256::from_be_bytes(word);
		if signed && word[0] & 0x80 != 0 {
			coerce::Integer {
				negative: true,
				magnitude: (!raw).overflowing_add(U256::from(1)).0,
			}
		} else {
			coerce::Integer {
				negative: false,
				magnitude: raw,
			}
		}
	}

	#[test]
	fn test_integer_round_trip_at_range_edges() {
		// (type, signed, in-range values, one-past-range values)
		let cases: Vec<(&str, bool, Vec<&str>, Vec<&str>)> = vec![
			("uint8", false, vec!["0", "255"], vec!["256", "-1"]),
			("int8", true, vec!["-128", "-1", "0", "127"], vec!["-129", "128"]),
			(
				"uint64",
				false,
				vec!["18446744073709551615"],
				vec!["18446744073709551616"],
			),
			(
				"int256",
				true,
				vec![
					"-57896044618658097711785492504343953926634992332820282019728792003956564819968",
					"57896044618658097711785492504343953926634992332820282019728792003956564819967",
				],
				vec![
					"-57896044618658097711785492504343953926634992332820282019728792003956564819969",
					"57896044618658097711785492504343953926634992332820282019728792003956564819968",
				],
			),
		];
		for (type_name, signed, in_range, out_of_range) in cases {
			let elem = ElementaryType::parse(type_name).unwrap();
			for value in in_range {
				let parsed = coerce::parse_integer(&elem, &json!(value)).unwrap();
				let word = primitive(type_name, &json!(value)).unwrap();
				assert_eq!(decode_word(word, signed), parsed, "{} {}", type_name, value);
			}
			for value in out_of_range {
				assert!(
					matches!(
						primitive(type_name, &json!(value)),
						Err(TypedDataError::IntegerOverflow { .. })
					),
					"expected {} {} to overflow",
					type_name,
					value
				);
			}
		}
	}

	#[test]
	fn test_absent_values_encode_as_zero() {
		for type_name in ["address", "bool", "bytes32", "uint256", "int8"] {
			let elem = ElementaryType::parse(type_name).unwrap();
			assert_eq!(
				encode_primitive_value(&elem, None, 0).unwrap(),
				[0u8; 32],
				"{}",
				type_name
			);
		}
		for type_name in ["bytes", "string"] {
			let elem = ElementaryType::parse(type_name).unwrap();
			assert_eq!(
				encode_primitive_value(&elem, None, 0).unwrap(),
				keccak256([0u8; 0]).0,
				"{}",
				type_name
			);
		}
	}
}
