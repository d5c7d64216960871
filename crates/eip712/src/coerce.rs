//! Coercions from loosely-typed JSON values into canonical primitives.
//!
//! The source representation accepts several concrete shapes for "a byte
//! sequence" or "an integer". Each elementary type admits a closed set of
//! input variants, validated and normalized here; nothing is inferred by
//! open-ended inspection of the value.

use crate::error::TypedDataError;
use crate::field_type::ElementaryType;
use alloy_primitives::U256;
use serde_json::Value;

/// A range-checked big integer as a sign/magnitude pair. The magnitude of a
/// negative value is its absolute value, so the full `uint256` and `int256`
/// ranges are both representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Integer {
	pub negative: bool,
	pub magnitude: U256,
}

impl Integer {
	/// The 32-byte big-endian two's-complement word. Negative values are
	/// sign-extended with `0xFF` bytes.
	pub fn to_word(&self) -> [u8; 32] {
		let encoded = if self.negative {
			(!self.magnitude).overflowing_add(U256::from(1)).0
		} else {
			self.magnitude
		};
		encoded.to_be_bytes::<32>()
	}
}

/// Normalizes a byte-like value into an unpadded byte sequence.
///
/// Accepted variants: a `0x`-prefixed even-length hex string (bare `0x` is
/// the empty sequence) or a JSON array of integers in `0..=255`. Everything
/// else, including unprefixed strings and bare integers, yields `None`.
pub fn parse_bytes(value: &Value) -> Option<Vec<u8>> {
	require_bytes(value, 0).ok()
}

/// [`parse_bytes`] with diagnostic errors instead of `None`.
pub(crate) fn require_bytes(value: &Value, depth: usize) -> Result<Vec<u8>, TypedDataError> {
	match value {
		Value::String(s) => {
			let Some(digits) = s.strip_prefix("0x") else {
				return Err(TypedDataError::TypeMismatch {
					expected: "0x-prefixed hex string".to_string(),
					actual: describe(value),
					depth,
				});
			};
			if digits.len() % 2 != 0 {
				return Err(TypedDataError::InvalidHexEncoding(s.clone()));
			}
			hex::decode(digits).map_err(|_| TypedDataError::InvalidHexEncoding(s.clone()))
		},
		Value::Array(items) => items
			.iter()
			.map(|item| {
				item.as_u64()
					.filter(|b| *b <= 255)
					.map(|b| b as u8)
					.ok_or_else(|| TypedDataError::TypeMismatch {
						expected: "byte array".to_string(),
						actual: describe(item),
						depth,
					})
			})
			.collect(),
		other => Err(TypedDataError::TypeMismatch {
			expected: "byte sequence".to_string(),
			actual: describe(other),
			depth,
		}),
	}
}

/// Parses and range-checks an integer value for an `intN`/`uintN` type.
///
/// Accepted variants: a decimal string with optional leading `-`, a
/// `0x`-prefixed hex string read as an unsigned magnitude, or a JSON
/// integer. Values outside the declared two's-complement (`intN`) or
/// unsigned (`uintN`) range fail with [`TypedDataError::IntegerOverflow`].
pub fn parse_integer(elem: &ElementaryType, value: &Value) -> Result<Integer, TypedDataError> {
	let (signed, bits) = match elem {
		ElementaryType::Int(n) => (true, *n),
		ElementaryType::Uint(n) => (false, *n),
		other => {
			return Err(TypedDataError::TypeMismatch {
				expected: "integer type".to_string(),
				actual: other.to_string(),
				depth: 0,
			})
		},
	};
	let overflow = || TypedDataError::IntegerOverflow {
		type_name: elem.to_string(),
		value: describe(value),
	};
	let mismatch = || TypedDataError::TypeMismatch {
		expected: elem.to_string(),
		actual: describe(value),
		depth: 0,
	};

	let (negative, magnitude) = match value {
		Value::String(s) => {
			if let Some(digits) = s.strip_prefix("0x") {
				if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
					return Err(TypedDataError::InvalidHexEncoding(s.clone()));
				}
				(false, U256::from_str_radix(digits, 16).map_err(|_| overflow())?)
			} else {
				let (negative, digits) = match s.strip_prefix('-') {
					Some(rest) => (true, rest),
					None => (false, s.as_str()),
				};
				if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
					return Err(mismatch());
				}
				(negative, U256::from_str_radix(digits, 10).map_err(|_| overflow())?)
			}
		},
		Value::Number(n) => {
			if let Some(u) = n.as_u64() {
				(false, U256::from(u))
			} else if let Some(i) = n.as_i64() {
				(true, U256::from(i.unsigned_abs()))
			} else {
				return Err(mismatch());
			}
		},
		_ => return Err(mismatch()),
	};

	let int = Integer {
		negative: negative && !magnitude.is_zero(),
		magnitude,
	};
	if signed {
		// Two's-complement range [-2^(N-1), 2^(N-1) - 1].
		let half = U256::from(1) << (bits - 1);
		let in_range = if int.negative {
			int.magnitude <= half
		} else {
			int.magnitude < half
		};
		if !in_range {
			return Err(overflow());
		}
	} else {
		if int.negative {
			return Err(overflow());
		}
		if bits < 256 && int.magnitude >= (U256::from(1) << bits) {
			return Err(overflow());
		}
	}
	Ok(int)
}

/// Normalizes an ordered collection into a slice of opaque element values,
/// preserving order. Anything that is not a JSON array is a shape mismatch.
pub fn convert_data_to_slice(value: &Value, depth: usize) -> Result<&[Value], TypedDataError> {
	match value {
		Value::Array(items) => Ok(items.as_slice()),
		other => Err(TypedDataError::TypeMismatch {
			expected: "array".to_string(),
			actual: describe(other),
			depth,
		}),
	}
}

/// Short description of a value for error messages. Scalars are rendered
/// verbatim; arrays and objects only by kind, to keep messages bounded.
pub(crate) fn describe(value: &Value) -> String {
	match value {
		Value::Array(_) => "array".to_string(),
		Value::Object(_) => "object".to_string(),
		other => other.to_string(),
	}
}
